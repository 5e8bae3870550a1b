//! Auto-completion predicate DSL over the trigger-fact store.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an insurance claim in the fact store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// The claim has been filed but not decided.
    Submitted,
    /// The insurer approved the claim.
    Approved,
    /// The insurer rejected the claim.
    Rejected,
    /// An operator overrode the insurer's decision.
    ManualOverride,
}

impl ClaimStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::ManualOverride => "manual_override",
        }
    }
}

/// One existence or state check against a trigger-fact source.
///
/// This is the whole predicate language: the engine never issues
/// arbitrary queries, only these closed checks keyed by dossier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FactCheck {
    /// A document of the given type exists with status `approved`.
    DocumentApproved {
        /// Document type code, e.g. `death-certificate`.
        document_type: String,
    },
    /// The dossier's insurance claim is in one of the given statuses.
    ClaimStatusIn {
        /// Accepted claim statuses.
        statuses: Vec<ClaimStatus>,
    },
    /// A case event of the given type has been recorded.
    CaseEventRecorded {
        /// Event type code, e.g. `fd-assigned`.
        event_type: String,
    },
    /// The dossier's final invoice has been sent.
    InvoiceSent,
    /// A flight record with a non-null air waybill exists.
    FlightHasWaybill,
}

impl fmt::Display for FactCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentApproved { document_type } => {
                write!(f, "document '{document_type}' approved")
            }
            Self::ClaimStatusIn { statuses } => {
                let names: Vec<&str> = statuses.iter().map(|status| status.as_str()).collect();
                write!(f, "claim status in {{{}}}", names.join(", "))
            }
            Self::CaseEventRecorded { event_type } => {
                write!(f, "case event '{event_type}' recorded")
            }
            Self::InvoiceSent => write!(f, "final invoice sent"),
            Self::FlightHasWaybill => write!(f, "flight has air waybill"),
        }
    }
}

/// Conjunction of fact checks attached to a catalogue template.
///
/// The rule is satisfied only when every check is; an empty rule is not
/// constructible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCompleteRule {
    checks: Vec<FactCheck>,
}

impl AutoCompleteRule {
    /// Creates a rule from a non-empty list of checks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRule`] when no checks are given.
    pub fn new(checks: impl IntoIterator<Item = FactCheck>) -> Result<Self, TaskDomainError> {
        let checks: Vec<FactCheck> = checks.into_iter().collect();
        if checks.is_empty() {
            return Err(TaskDomainError::EmptyRule);
        }
        Ok(Self { checks })
    }

    /// Returns the checks in evaluation order.
    #[must_use]
    pub fn checks(&self) -> &[FactCheck] {
        &self.checks
    }

    /// Returns a human-readable description of the whole conjunction.
    ///
    /// The description is recorded on the task when the rule fires, so an
    /// auditor can see which predicate completed it.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.checks.iter().map(ToString::to_string).collect();
        parts.join(" and ")
    }
}

impl fmt::Display for AutoCompleteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
