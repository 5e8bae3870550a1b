//! In-memory trigger-fact store for evaluator tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::dossier::domain::DossierId;
use crate::task::{
    domain::{ClaimStatus, FactCheck},
    ports::{FactStore, FactStoreError, FactStoreResult},
};

/// Per-dossier snapshot of the business facts predicates read.
#[derive(Debug, Default, Clone)]
struct DossierFacts {
    approved_documents: HashSet<String>,
    claim_status: Option<ClaimStatus>,
    case_events: HashSet<String>,
    invoice_sent: bool,
    waybill_present: bool,
}

/// Thread-safe in-memory stand-in for the external fact tables.
///
/// Tests arrange facts through the mutator methods and may mark a dossier
/// unreachable to exercise partial-failure collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFactStore {
    state: Arc<RwLock<InMemoryFactState>>,
}

#[derive(Debug, Default)]
struct InMemoryFactState {
    facts: HashMap<DossierId, DossierFacts>,
    unreachable: HashSet<DossierId>,
}

fn lock_error(err: impl std::fmt::Display) -> FactStoreError {
    FactStoreError::query(std::io::Error::other(err.to_string()))
}

impl InMemoryFactStore {
    /// Creates an empty fact store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an approved document of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError::Query`] when the lock is poisoned.
    pub fn approve_document(
        &self,
        dossier_id: DossierId,
        document_type: impl Into<String>,
    ) -> FactStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .facts
            .entry(dossier_id)
            .or_default()
            .approved_documents
            .insert(document_type.into());
        Ok(())
    }

    /// Sets the dossier's claim status.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError::Query`] when the lock is poisoned.
    pub fn set_claim_status(
        &self,
        dossier_id: DossierId,
        status: ClaimStatus,
    ) -> FactStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.facts.entry(dossier_id).or_default().claim_status = Some(status);
        Ok(())
    }

    /// Records a case event of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError::Query`] when the lock is poisoned.
    pub fn record_case_event(
        &self,
        dossier_id: DossierId,
        event_type: impl Into<String>,
    ) -> FactStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .facts
            .entry(dossier_id)
            .or_default()
            .case_events
            .insert(event_type.into());
        Ok(())
    }

    /// Marks the final invoice as sent.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError::Query`] when the lock is poisoned.
    pub fn mark_invoice_sent(&self, dossier_id: DossierId) -> FactStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.facts.entry(dossier_id).or_default().invoice_sent = true;
        Ok(())
    }

    /// Records a flight with an air waybill.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError::Query`] when the lock is poisoned.
    pub fn set_waybill(&self, dossier_id: DossierId) -> FactStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.facts.entry(dossier_id).or_default().waybill_present = true;
        Ok(())
    }

    /// Makes every query for the dossier fail, simulating an unreachable
    /// fact source.
    ///
    /// # Errors
    ///
    /// Returns [`FactStoreError::Query`] when the lock is poisoned.
    pub fn mark_unreachable(&self, dossier_id: DossierId) -> FactStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unreachable.insert(dossier_id);
        Ok(())
    }
}

#[async_trait]
impl FactStore for InMemoryFactStore {
    async fn is_satisfied(
        &self,
        dossier_id: DossierId,
        check: &FactCheck,
    ) -> FactStoreResult<bool> {
        let state = self.state.read().map_err(lock_error)?;
        if state.unreachable.contains(&dossier_id) {
            return Err(FactStoreError::Unreachable(dossier_id.to_string()));
        }
        let Some(facts) = state.facts.get(&dossier_id) else {
            return Ok(false);
        };
        let satisfied = match check {
            FactCheck::DocumentApproved { document_type } => {
                facts.approved_documents.contains(document_type)
            }
            FactCheck::ClaimStatusIn { statuses } => facts
                .claim_status
                .is_some_and(|status| statuses.contains(&status)),
            FactCheck::CaseEventRecorded { event_type } => {
                facts.case_events.contains(event_type)
            }
            FactCheck::InvoiceSent => facts.invoice_sent,
            FactCheck::FlightHasWaybill => facts.waybill_present,
        };
        Ok(satisfied)
    }
}
