//! Append-only audit-log port.

use crate::dossier::domain::AuditEntry;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit-log operations.
pub type AuditLogResult<T> = Result<T, AuditLogError>;

/// Append-only audit trail contract.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends one audit entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuditLogError::Persistence`] when the entry cannot be
    /// written.
    async fn record(&self, entry: &AuditEntry) -> AuditLogResult<()>;
}

/// Errors returned by audit-log implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditLogError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
