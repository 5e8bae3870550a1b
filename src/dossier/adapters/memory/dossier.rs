//! In-memory dossier repository for lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dossier::{
    domain::{CaseReference, Dossier, DossierId, StatusHistoryEvent},
    ports::{DossierRepository, DossierRepositoryError, DossierRepositoryResult},
};

/// Thread-safe in-memory dossier repository.
///
/// A single write lock over the whole state makes
/// [`DossierRepository::commit_transition`] atomic, matching the
/// transactional guarantee of the `PostgreSQL` adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDossierRepository {
    state: Arc<RwLock<InMemoryDossierState>>,
}

#[derive(Debug, Default)]
struct InMemoryDossierState {
    dossiers: HashMap<DossierId, Dossier>,
    reference_index: HashMap<CaseReference, DossierId>,
    history: Vec<StatusHistoryEvent>,
}

impl InMemoryDossierRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> DossierRepositoryError {
    DossierRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DossierRepository for InMemoryDossierRepository {
    async fn insert(&self, dossier: &Dossier) -> DossierRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.dossiers.contains_key(&dossier.id()) {
            return Err(DossierRepositoryError::DuplicateDossier(dossier.id()));
        }
        if state.reference_index.contains_key(dossier.reference()) {
            return Err(DossierRepositoryError::DuplicateReference(
                dossier.reference().clone(),
            ));
        }
        state
            .reference_index
            .insert(dossier.reference().clone(), dossier.id());
        state.dossiers.insert(dossier.id(), dossier.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: DossierId) -> DossierRepositoryResult<Option<Dossier>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.dossiers.get(&id).cloned())
    }

    async fn commit_transition(
        &self,
        dossier: &Dossier,
        event: &StatusHistoryEvent,
    ) -> DossierRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let stored = state
            .dossiers
            .get(&dossier.id())
            .ok_or(DossierRepositoryError::NotFound(dossier.id()))?;
        if stored.status() != event.from() {
            return Err(DossierRepositoryError::StaleTransition {
                dossier_id: dossier.id(),
                stored: stored.status(),
            });
        }
        state.dossiers.insert(dossier.id(), dossier.clone());
        state.history.push(event.clone());
        Ok(())
    }

    async fn update_legal_hold(&self, dossier: &Dossier) -> DossierRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.dossiers.contains_key(&dossier.id()) {
            return Err(DossierRepositoryError::NotFound(dossier.id()));
        }
        state.dossiers.insert(dossier.id(), dossier.clone());
        Ok(())
    }

    async fn history_for(
        &self,
        id: DossierId,
    ) -> DossierRepositoryResult<Vec<StatusHistoryEvent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .history
            .iter()
            .filter(|event| event.dossier_id() == id)
            .cloned()
            .collect())
    }
}
