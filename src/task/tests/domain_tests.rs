//! Unit tests for task domain types and template instantiation.

use crate::dossier::domain::{CaseReference, Dossier, FlowKind};
use crate::task::domain::{
    AutoCompleteRule, BoardColumn, ClaimStatus, CompletionSource, FactCheck, TaskDomainError,
    TaskPriority, TaskTemplate, TaskTypeCode,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn dossier(clock: DefaultClock) -> Dossier {
    let reference = CaseReference::new("RP-2026-0042").expect("valid reference");
    Dossier::open(reference, FlowKind::Repatriation, &clock)
}

#[rstest]
#[case("welcome", true)]
#[case("family-contact", true)]
#[case("task-2", true)]
#[case("", false)]
#[case("   ", false)]
#[case("Family Contact", false)]
#[case("family_contact", false)]
fn task_type_code_validation(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(TaskTypeCode::new(raw).is_ok(), valid);
}

#[rstest]
fn template_renders_reference_into_title(clock: DefaultClock, dossier: Dossier) {
    let template = TaskTemplate::new(
        TaskTypeCode::new("flight-booking").expect("valid code"),
        "Book air freight for {{ reference }}",
        1,
    )
    .with_description("Flow: {{ flow }}");

    let task = template
        .instantiate(&dossier, 0, &clock)
        .expect("instantiates");

    assert_eq!(task.title(), "Book air freight for RP-2026-0042");
    assert_eq!(task.description(), Some("Flow: repatriation"));
    assert_eq!(task.column(), BoardColumn::Todo);
    assert_eq!(task.priority(), TaskPriority::Medium);
    assert_eq!(task.position(), 0);
    assert!(task.is_open());
}

#[rstest]
fn template_with_unknown_variable_fails_to_render(clock: DefaultClock, dossier: Dossier) {
    let template = TaskTemplate::new(
        TaskTypeCode::new("broken").expect("valid code"),
        "{{ reference",
        1,
    );

    let result = template.instantiate(&dossier, 0, &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::TemplateRender { .. })
    ));
}

#[rstest]
fn empty_rule_is_not_constructible() {
    assert_eq!(
        AutoCompleteRule::new([]),
        Err(TaskDomainError::EmptyRule)
    );
}

#[rstest]
fn rule_description_names_every_check() {
    let rule = AutoCompleteRule::new([
        FactCheck::DocumentApproved {
            document_type: "laissez-passer".to_owned(),
        },
        FactCheck::ClaimStatusIn {
            statuses: vec![ClaimStatus::Approved, ClaimStatus::ManualOverride],
        },
        FactCheck::FlightHasWaybill,
    ])
    .expect("valid rule");

    assert_eq!(
        rule.describe(),
        "document 'laissez-passer' approved and claim status in {approved, manual_override} \
         and flight has air waybill"
    );
}

#[rstest]
fn completing_via_rule_is_monotonic(clock: DefaultClock, dossier: Dossier) {
    let template = TaskTemplate::new(
        TaskTypeCode::new("gdpr").expect("valid code"),
        "Collect the signed GDPR consent",
        1,
    );
    let mut task = template
        .instantiate(&dossier, 0, &clock)
        .expect("instantiates");

    task.complete_via_rule("document 'gdpr-consent' approved", &clock)
        .expect("first completion");
    assert_eq!(task.column(), BoardColumn::Done);
    assert!(matches!(
        task.completion().map(|completion| &completion.source),
        Some(CompletionSource::Predicate { .. })
    ));

    let second = task.complete_via_rule("document 'gdpr-consent' approved", &clock);
    assert_eq!(second, Err(TaskDomainError::AlreadyCompleted(task.id())));
    assert_eq!(task.column(), BoardColumn::Done);
}

#[rstest]
fn placing_into_done_records_manual_completion(clock: DefaultClock, dossier: Dossier) {
    let template = TaskTemplate::new(
        TaskTypeCode::new("welcome").expect("valid code"),
        "Send the welcome pack",
        1,
    );
    let mut task = template
        .instantiate(&dossier, 0, &clock)
        .expect("instantiates");

    task.place(BoardColumn::Done, 5, &clock);
    assert!(matches!(
        task.completion().map(|completion| &completion.source),
        Some(CompletionSource::Manual)
    ));
    assert!(!task.is_open());

    // Dragging back out of Done reopens the task.
    task.place(BoardColumn::Doing, 2, &clock);
    assert!(task.completion().is_none());
    assert!(task.is_open());
}

#[rstest]
fn blocked_flag_round_trips(clock: DefaultClock, dossier: Dossier) {
    let template = TaskTemplate::new(
        TaskTypeCode::new("customs-clearance").expect("valid code"),
        "Clear outbound customs",
        1,
    );
    let mut task = template
        .instantiate(&dossier, 0, &clock)
        .expect("instantiates");

    task.block("waiting on airline paperwork");
    assert!(task.is_blocked());
    assert_eq!(task.blocked_reason(), Some("waiting on airline paperwork"));

    task.unblock();
    assert!(!task.is_blocked());
    assert_eq!(task.blocked_reason(), None);
}
