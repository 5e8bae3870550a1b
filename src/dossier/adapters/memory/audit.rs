//! In-memory audit log for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::dossier::{
    domain::AuditEntry,
    ports::{AuditLog, AuditLogError, AuditLogResult},
};

/// Thread-safe in-memory audit log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLog {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    /// Creates an empty in-memory audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError::Persistence`] when the lock is poisoned.
    pub fn recorded(&self) -> AuditLogResult<Vec<AuditEntry>> {
        let entries = self.entries.read().map_err(|err| {
            AuditLogError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(entries.clone())
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record(&self, entry: &AuditEntry) -> AuditLogResult<()> {
        let mut entries = self.entries.write().map_err(|err| {
            AuditLogError::persistence(std::io::Error::other(err.to_string()))
        })?;
        entries.push(entry.clone());
        Ok(())
    }
}
