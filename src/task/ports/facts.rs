//! Read-only port onto the trigger-fact store.

use crate::dossier::domain::DossierId;
use crate::task::domain::FactCheck;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for fact-store queries.
pub type FactStoreResult<T> = Result<T, FactStoreError>;

/// Read-only access to the business tables the auto-completion
/// predicates are evaluated against.
///
/// The engine never writes through this port and never issues queries
/// beyond the closed [`FactCheck`] language.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Returns whether a single fact check currently holds for a dossier.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError`] when the underlying fact source cannot
    /// be reached or the query fails.
    async fn is_satisfied(
        &self,
        dossier_id: DossierId,
        check: &FactCheck,
    ) -> FactStoreResult<bool>;
}

/// Errors returned by fact-store implementations.
#[derive(Debug, Clone, Error)]
pub enum FactStoreError {
    /// The fact source could not be reached.
    #[error("fact source unreachable: {0}")]
    Unreachable(String),

    /// The fact query itself failed.
    #[error("fact query failed: {0}")]
    Query(Arc<dyn std::error::Error + Send + Sync>),
}

impl FactStoreError {
    /// Wraps a query error.
    pub fn query(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Query(Arc::new(err))
    }
}
