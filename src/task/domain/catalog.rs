//! Static, versioned task template catalogue.

use super::{
    AutoCompleteRule, ClaimStatus, FactCheck, LifecyclePhase, TaskDomainError, TaskPriority,
    TaskTemplate, TaskTypeCode,
};
use crate::dossier::domain::FlowKind;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fmt::Write as _;

/// Content fingerprint identifying one catalogue revision.
///
/// The version is the SHA-256 of the serialized entries, so any edit to
/// the catalogue produces a new version without manual bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogVersion(String);

impl CatalogVersion {
    /// Returns the version as a hex digest string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One (flow, phase) keyed catalogue row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Flow the template applies to.
    pub flow: FlowKind,
    /// Phase the template is seeded in.
    pub phase: LifecyclePhase,
    /// The template itself.
    pub template: TaskTemplate,
}

/// The static task template catalogue.
///
/// `templates_for` is a pure function over this configuration: unsupported
/// flows (notably [`FlowKind::Unset`]) and phases without entries yield an
/// empty list, signalling "no seeding applicable" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    entries: Vec<CatalogEntry>,
}

impl TemplateCatalog {
    /// Creates a catalogue from explicit entries.
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Builds the built-in production catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when a built-in entry is malformed;
    /// this only fires on a programming error in the catalogue itself.
    pub fn builtin() -> Result<Self, TaskDomainError> {
        let mut entries = Vec::new();
        push_onboarding(&mut entries, FlowKind::Local)?;
        push_onboarding(&mut entries, FlowKind::Repatriation)?;
        entries.push(entry(
            FlowKind::Repatriation,
            LifecyclePhase::Onboarding,
            TaskTemplate::new(
                TaskTypeCode::new("embassy-notify")?,
                "Notify the destination embassy for {{ reference }}",
                4,
            )
            .with_priority(TaskPriority::High),
        ));

        push_local_intake(&mut entries)?;
        push_repatriation_intake(&mut entries)?;
        push_verify(&mut entries)?;
        push_settlement(&mut entries, FlowKind::Local)?;
        push_settlement(&mut entries, FlowKind::Repatriation)?;

        Ok(Self { entries })
    }

    /// Returns the templates to seed for a flow and phase, in order.
    #[must_use]
    pub fn templates_for(&self, flow: FlowKind, phase: LifecyclePhase) -> Vec<TaskTemplate> {
        let mut templates: Vec<TaskTemplate> = self
            .entries
            .iter()
            .filter(|candidate| candidate.flow == flow && candidate.phase == phase)
            .map(|candidate| candidate.template.clone())
            .collect();
        templates.sort_by_key(TaskTemplate::order);
        templates
    }

    /// Looks up the auto-completion rule for a task type within a flow.
    ///
    /// Tasks keep only their type code; the rule always lives here.
    #[must_use]
    pub fn rule_for(
        &self,
        flow: FlowKind,
        task_type: &TaskTypeCode,
    ) -> Option<&AutoCompleteRule> {
        self.entries
            .iter()
            .find(|candidate| {
                candidate.flow == flow && candidate.template.task_type() == task_type
            })
            .and_then(|candidate| candidate.template.rule())
    }

    /// Returns the content fingerprint of this catalogue revision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TemplateRender`] only when the entries
    /// cannot be serialized, which indicates a programming error.
    pub fn version(&self) -> Result<CatalogVersion, TaskDomainError> {
        let serialized =
            serde_json::to_vec(&self.entries).map_err(|error| TaskDomainError::TemplateRender {
                task_type: "catalog".to_owned(),
                reason: error.to_string(),
            })?;
        let digest = Sha256::digest(&serialized);
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Ok(CatalogVersion(hex))
    }
}

fn entry(flow: FlowKind, phase: LifecyclePhase, template: TaskTemplate) -> CatalogEntry {
    CatalogEntry {
        flow,
        phase,
        template,
    }
}

/// Onboarding templates shared by both decided flows.
fn push_onboarding(
    entries: &mut Vec<CatalogEntry>,
    flow: FlowKind,
) -> Result<(), TaskDomainError> {
    entries.push(entry(
        flow,
        LifecyclePhase::Onboarding,
        TaskTemplate::new(
            TaskTypeCode::new("welcome")?,
            "Send the welcome pack for {{ reference }}",
            1,
        )
        .with_description("Introduce the assigned case manager to the family."),
    ));
    entries.push(entry(
        flow,
        LifecyclePhase::Onboarding,
        TaskTemplate::new(
            TaskTypeCode::new("family-contact")?,
            "Record next-of-kin contact details",
            2,
        ),
    ));
    entries.push(entry(
        flow,
        LifecyclePhase::Onboarding,
        TaskTemplate::new(
            TaskTypeCode::new("gdpr")?,
            "Collect the signed GDPR consent",
            3,
        )
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "gdpr-consent".to_owned(),
        }])?),
    ));
    Ok(())
}

fn push_local_intake(entries: &mut Vec<CatalogEntry>) -> Result<(), TaskDomainError> {
    entries.push(entry(
        FlowKind::Local,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("death-certificate")?,
            "Obtain the death certificate for {{ reference }}",
            1,
        )
        .with_priority(TaskPriority::Urgent)
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "death-certificate".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Local,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("funeral-director")?,
            "Assign a funeral director",
            2,
        )
        .with_priority(TaskPriority::High)
        .with_rule(AutoCompleteRule::new([FactCheck::CaseEventRecorded {
            event_type: "fd-assigned".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Local,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("burial-order")?,
            "Confirm the burial or cremation order with the municipality",
            3,
        )
        .with_priority(TaskPriority::High),
    ));
    entries.push(entry(
        FlowKind::Local,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("insurance-claim")?,
            "File the insurance claim",
            4,
        )
        .with_rule(AutoCompleteRule::new([FactCheck::ClaimStatusIn {
            statuses: vec![ClaimStatus::Approved, ClaimStatus::ManualOverride],
        }])?),
    ));
    Ok(())
}

fn push_repatriation_intake(entries: &mut Vec<CatalogEntry>) -> Result<(), TaskDomainError> {
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("death-certificate")?,
            "Obtain the death certificate for {{ reference }}",
            1,
        )
        .with_priority(TaskPriority::Urgent)
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "death-certificate".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("laissez-passer")?,
            "Obtain the mortuary passport (laissez-passer)",
            2,
        )
        .with_priority(TaskPriority::Urgent)
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "laissez-passer".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("embalming-certificate")?,
            "Collect the embalming certificate",
            3,
        )
        .with_priority(TaskPriority::High)
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "embalming-certificate".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("flight-booking")?,
            "Book air freight for {{ reference }}",
            4,
        )
        .with_priority(TaskPriority::High)
        .with_rule(AutoCompleteRule::new([FactCheck::FlightHasWaybill])?),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Intake,
        TaskTemplate::new(
            TaskTypeCode::new("insurance-claim")?,
            "File the insurance claim",
            5,
        )
        .with_rule(AutoCompleteRule::new([FactCheck::ClaimStatusIn {
            statuses: vec![ClaimStatus::Approved, ClaimStatus::ManualOverride],
        }])?),
    ));
    Ok(())
}

fn push_verify(entries: &mut Vec<CatalogEntry>) -> Result<(), TaskDomainError> {
    entries.push(entry(
        FlowKind::Local,
        LifecyclePhase::Verify,
        TaskTemplate::new(
            TaskTypeCode::new("registry-check")?,
            "Verify the civil registry entry",
            1,
        )
        .with_priority(TaskPriority::High)
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "registry-extract".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Local,
        LifecyclePhase::Verify,
        TaskTemplate::new(
            TaskTypeCode::new("service-confirmation")?,
            "Confirm ceremony arrangements with the family",
            2,
        ),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Verify,
        TaskTemplate::new(
            TaskTypeCode::new("consulate-legalisation")?,
            "Have the document file legalised by the consulate",
            1,
        )
        .with_priority(TaskPriority::High)
        .with_rule(AutoCompleteRule::new([FactCheck::DocumentApproved {
            document_type: "consular-legalisation".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Verify,
        TaskTemplate::new(
            TaskTypeCode::new("customs-clearance")?,
            "Clear outbound customs for {{ reference }}",
            2,
        )
        .with_priority(TaskPriority::Urgent)
        .with_rule(AutoCompleteRule::new([FactCheck::CaseEventRecorded {
            event_type: "customs-cleared".to_owned(),
        }])?),
    ));
    entries.push(entry(
        FlowKind::Repatriation,
        LifecyclePhase::Verify,
        TaskTemplate::new(
            TaskTypeCode::new("waybill-check")?,
            "Verify the air waybill against the booking",
            3,
        ),
    ));
    Ok(())
}

fn push_settlement(
    entries: &mut Vec<CatalogEntry>,
    flow: FlowKind,
) -> Result<(), TaskDomainError> {
    entries.push(entry(
        flow,
        LifecyclePhase::Settlement,
        TaskTemplate::new(
            TaskTypeCode::new("final-invoice")?,
            "Send the final invoice for {{ reference }}",
            1,
        )
        .with_priority(TaskPriority::High)
        .with_rule(AutoCompleteRule::new([FactCheck::InvoiceSent])?),
    ));
    entries.push(entry(
        flow,
        LifecyclePhase::Settlement,
        TaskTemplate::new(
            TaskTypeCode::new("aftercare")?,
            "Schedule the aftercare call",
            2,
        )
        .with_priority(TaskPriority::Low),
    ));
    Ok(())
}
