//! Unit tests for the template catalogue.

use crate::dossier::domain::{DossierStatus, FlowKind};
use crate::task::domain::{LifecyclePhase, TaskTypeCode, TemplateCatalog};
use rstest::{fixture, rstest};

#[fixture]
fn catalog() -> TemplateCatalog {
    TemplateCatalog::builtin().expect("builtin catalog")
}

#[rstest]
fn local_onboarding_has_the_three_welcome_tasks(catalog: TemplateCatalog) {
    let templates = catalog.templates_for(FlowKind::Local, LifecyclePhase::Onboarding);
    let types: Vec<&str> = templates
        .iter()
        .map(|template| template.task_type().as_str())
        .collect();

    assert_eq!(types, vec!["welcome", "family-contact", "gdpr"]);
}

#[rstest]
fn local_intake_has_four_templates(catalog: TemplateCatalog) {
    let templates = catalog.templates_for(FlowKind::Local, LifecyclePhase::Intake);
    assert_eq!(templates.len(), 4);
}

#[rstest]
fn repatriation_onboarding_adds_the_embassy_task(catalog: TemplateCatalog) {
    let templates = catalog.templates_for(FlowKind::Repatriation, LifecyclePhase::Onboarding);
    let types: Vec<&str> = templates
        .iter()
        .map(|template| template.task_type().as_str())
        .collect();

    assert_eq!(
        types,
        vec!["welcome", "family-contact", "gdpr", "embassy-notify"]
    );
}

#[rstest]
#[case(FlowKind::Unset, LifecyclePhase::Onboarding)]
#[case(FlowKind::Unset, LifecyclePhase::Intake)]
#[case(FlowKind::Local, LifecyclePhase::Closure)]
#[case(FlowKind::Repatriation, LifecyclePhase::Closure)]
fn unsupported_flow_or_phase_yields_no_templates(
    catalog: TemplateCatalog,
    #[case] flow: FlowKind,
    #[case] phase: LifecyclePhase,
) {
    assert!(catalog.templates_for(flow, phase).is_empty());
}

#[rstest]
#[case(DossierStatus::Created, LifecyclePhase::Onboarding)]
#[case(DossierStatus::InProgress, LifecyclePhase::Intake)]
#[case(DossierStatus::UnderReview, LifecyclePhase::Verify)]
#[case(DossierStatus::Completed, LifecyclePhase::Settlement)]
#[case(DossierStatus::Closed, LifecyclePhase::Closure)]
fn every_status_maps_to_a_phase(
    #[case] status: DossierStatus,
    #[case] expected: LifecyclePhase,
) {
    assert_eq!(LifecyclePhase::for_status(status), expected);
}

#[rstest]
fn rules_are_resolvable_by_flow_and_type(catalog: TemplateCatalog) {
    let gdpr = TaskTypeCode::new("gdpr").expect("valid code");
    let welcome = TaskTypeCode::new("welcome").expect("valid code");

    assert!(catalog.rule_for(FlowKind::Local, &gdpr).is_some());
    assert!(catalog.rule_for(FlowKind::Repatriation, &gdpr).is_some());
    assert!(catalog.rule_for(FlowKind::Local, &welcome).is_none());
    assert!(catalog.rule_for(FlowKind::Unset, &gdpr).is_none());
}

#[rstest]
fn version_is_deterministic_for_identical_content(catalog: TemplateCatalog) {
    let other = TemplateCatalog::builtin().expect("builtin catalog");

    let first = catalog.version().expect("version");
    let second = other.version().expect("version");

    assert_eq!(first, second);
    assert_eq!(first.as_str().len(), 64, "sha-256 hex digest");
}

#[rstest]
fn version_changes_when_content_changes(catalog: TemplateCatalog) {
    let trimmed = TemplateCatalog::new(Vec::new());

    let full = catalog.version().expect("version");
    let empty = trimmed.version().expect("version");

    assert_ne!(full, empty);
}
