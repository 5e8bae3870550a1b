//! Repository port for dossier persistence and transactional transitions.

use crate::dossier::domain::{
    CaseReference, Dossier, DossierId, DossierStatus, StatusHistoryEvent,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dossier repository operations.
pub type DossierRepositoryResult<T> = Result<T, DossierRepositoryError>;

/// Dossier persistence contract.
///
/// The dossier row is the serialization point for its case:
/// [`DossierRepository::commit_transition`] must be mutually exclusive per
/// dossier so two concurrent transitions can never both commit from the
/// same source status.
#[async_trait]
pub trait DossierRepository: Send + Sync {
    /// Stores a new dossier.
    ///
    /// # Errors
    ///
    /// Returns [`DossierRepositoryError::DuplicateDossier`] when the
    /// identifier already exists or
    /// [`DossierRepositoryError::DuplicateReference`] when the case
    /// reference is already taken.
    async fn insert(&self, dossier: &Dossier) -> DossierRepositoryResult<()>;

    /// Finds a dossier by identifier.
    ///
    /// Returns `None` when the dossier does not exist.
    async fn find_by_id(&self, id: DossierId) -> DossierRepositoryResult<Option<Dossier>>;

    /// Atomically commits a gated status transition.
    ///
    /// The status update and the history-event insert happen in a single
    /// transaction, compare-and-set against the event's `from` status: a
    /// reader never observes a status without its history event, and a
    /// lost race surfaces as [`DossierRepositoryError::StaleTransition`]
    /// instead of a double commit.
    ///
    /// # Errors
    ///
    /// Returns [`DossierRepositoryError::NotFound`] when the dossier does
    /// not exist or [`DossierRepositoryError::StaleTransition`] when the
    /// stored status no longer matches the event's `from` status.
    async fn commit_transition(
        &self,
        dossier: &Dossier,
        event: &StatusHistoryEvent,
    ) -> DossierRepositoryResult<()>;

    /// Persists a legal-hold flag change.
    ///
    /// # Errors
    ///
    /// Returns [`DossierRepositoryError::NotFound`] when the dossier does
    /// not exist.
    async fn update_legal_hold(&self, dossier: &Dossier) -> DossierRepositoryResult<()>;

    /// Returns all history events for a dossier, oldest first.
    async fn history_for(
        &self,
        id: DossierId,
    ) -> DossierRepositoryResult<Vec<StatusHistoryEvent>>;
}

/// Errors returned by dossier repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DossierRepositoryError {
    /// A dossier with the same identifier already exists.
    #[error("duplicate dossier identifier: {0}")]
    DuplicateDossier(DossierId),

    /// A dossier with the same case reference already exists.
    #[error("duplicate case reference: {0}")]
    DuplicateReference(CaseReference),

    /// The dossier was not found.
    #[error("dossier not found: {0}")]
    NotFound(DossierId),

    /// The stored status no longer matches the transition's source status.
    #[error("stale transition for dossier {dossier_id}: stored status is {stored:?}")]
    StaleTransition {
        /// The dossier whose transition lost the race.
        dossier_id: DossierId,
        /// The status found in storage at commit time.
        stored: DossierStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DossierRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
