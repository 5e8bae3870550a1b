//! Domain model for dossier lifecycle management.
//!
//! The dossier domain models the legal case record, its workflow status
//! state machine, the transition gates, the append-only status history,
//! and the audit trail, while keeping all infrastructure concerns outside
//! of the domain boundary.

mod actor;
mod audit;
mod dossier;
mod error;
mod flow;
mod history;
mod ids;
mod status;

pub use actor::{Actor, ActorId};
pub use audit::{AuditAction, AuditEntry};
pub use dossier::{Dossier, PersistedDossierData};
pub use error::{
    DossierDomainError, GateError, ParseFlowKindError, ParseStatusError,
};
pub use flow::FlowKind;
pub use history::{PersistedHistoryData, StatusHistoryEvent};
pub use ids::{CaseReference, DossierId, HistoryEventId};
pub use status::DossierStatus;
