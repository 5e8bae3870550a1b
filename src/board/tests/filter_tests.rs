//! Unit tests for pure board filtering.

use crate::board::domain::BoardFilter;
use crate::dossier::domain::{CaseReference, Dossier, FlowKind};
use crate::task::domain::{Task, TaskPriority, TaskTypeCode};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn task(title: &str, priority: TaskPriority, clock: &DefaultClock) -> Task {
    let reference = CaseReference::new("RP-2026-0042").expect("valid reference");
    let dossier = Dossier::open(reference, FlowKind::Local, clock);
    Task::seeded(
        dossier.id(),
        TaskTypeCode::new("welcome").expect("valid code"),
        title,
        None,
        priority,
        0,
        clock,
    )
    .expect("valid task")
}

#[rstest]
fn empty_filter_matches_everything(clock: DefaultClock) {
    let tasks = vec![
        task("Send the welcome pack", TaskPriority::Medium, &clock),
        task("Book air freight", TaskPriority::High, &clock),
    ];

    let filter = BoardFilter::new();
    assert_eq!(filter.apply(&tasks).len(), 2);
}

#[rstest]
fn search_matches_title_case_insensitively(clock: DefaultClock) {
    let tasks = vec![
        task("Send the welcome pack", TaskPriority::Medium, &clock),
        task("Book air freight", TaskPriority::High, &clock),
    ];

    let filter = BoardFilter::new().with_search("WELCOME");
    let matched = filter.apply(&tasks);

    assert_eq!(matched.len(), 1);
    assert_eq!(
        matched.first().map(|found| found.title()),
        Some("Send the welcome pack")
    );
}

#[rstest]
fn priority_filter_is_exact(clock: DefaultClock) {
    let tasks = vec![
        task("Send the welcome pack", TaskPriority::Medium, &clock),
        task("Book air freight", TaskPriority::High, &clock),
        task("Clear customs", TaskPriority::Urgent, &clock),
    ];

    let filter = BoardFilter::new().with_priority(TaskPriority::High);
    let matched = filter.apply(&tasks);

    assert_eq!(matched.len(), 1);
    assert_eq!(
        matched.first().map(|found| found.priority()),
        Some(TaskPriority::High)
    );
}

#[rstest]
fn assignee_filter_requires_an_assignment(clock: DefaultClock) {
    let mut assigned = task("Send the welcome pack", TaskPriority::Medium, &clock);
    assigned.assign("alice");
    let unassigned = task("Book air freight", TaskPriority::High, &clock);
    let tasks = vec![assigned, unassigned];

    let filter = BoardFilter::new().with_assignee("alice");
    let matched = filter.apply(&tasks);

    assert_eq!(matched.len(), 1);
    assert_eq!(matched.first().and_then(|found| found.assignee()), Some("alice"));
}

#[rstest]
fn combined_criteria_are_conjunctive(clock: DefaultClock) {
    let mut wanted = task("Book air freight", TaskPriority::High, &clock);
    wanted.assign("alice");
    let mut wrong_priority = task("Book ground transport", TaskPriority::Low, &clock);
    wrong_priority.assign("alice");
    let tasks = vec![wanted, wrong_priority];

    let filter = BoardFilter::new()
        .with_search("book")
        .with_priority(TaskPriority::High)
        .with_assignee("alice");
    let matched = filter.apply(&tasks);

    assert_eq!(matched.len(), 1);
    assert_eq!(
        matched.first().map(|found| found.title()),
        Some("Book air freight")
    );
}
