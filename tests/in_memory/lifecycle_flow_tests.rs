//! End-to-end dossier lifecycle over in-memory adapters.

use super::helpers::{complete_all_tasks, engine, open_dossier, staff};
use cortege::board::{domain::BoardFilter, services::TaskBoard};
use cortege::dossier::domain::{DossierStatus, FlowKind, GateError};
use cortege::dossier::ports::DossierRepository;
use cortege::dossier::services::{GatekeeperError, TransitionRequest};
use cortege::task::domain::{BoardColumn, BoardScope, TaskPriority};
use cortege::task::ports::TaskRepository;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread")]
async fn local_dossier_walks_the_whole_workflow() {
    let engine = engine();
    let dossier = open_dossier(&engine, "RP-2026-0042", FlowKind::Local).await;

    // Opening seeds the three onboarding tasks.
    let seeded = engine
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    let mut types: Vec<&str> = seeded.iter().map(|task| task.task_type().as_str()).collect();
    types.sort_unstable();
    assert_eq!(types, vec!["family-contact", "gdpr", "welcome"]);

    // Blocked until all three are done.
    let premature = engine
        .gatekeeper
        .transition(TransitionRequest::new(
            dossier.id(),
            DossierStatus::InProgress,
            staff(),
        ))
        .await;
    assert!(matches!(
        premature,
        Err(GatekeeperError::Gate(GateError::OpenTasks(3)))
    ));

    complete_all_tasks(&engine, &dossier).await;
    engine
        .gatekeeper
        .transition(TransitionRequest::new(
            dossier.id(),
            DossierStatus::InProgress,
            staff(),
        ))
        .await
        .expect("transition to in_progress");

    // Entering Intake seeds four more tasks.
    let after_intake = engine
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    assert_eq!(after_intake.len(), 7);
    assert_eq!(
        after_intake.iter().filter(|task| task.is_open()).count(),
        4
    );

    // Facts arriving in the trigger store retire the predicate tasks.
    engine
        .facts
        .approve_document(dossier.id(), "death-certificate")
        .expect("fact recorded");
    engine
        .facts
        .record_case_event(dossier.id(), "fd-assigned")
        .expect("fact recorded");
    engine
        .facts
        .set_claim_status(
            dossier.id(),
            cortege::task::domain::ClaimStatus::Approved,
        )
        .expect("fact recorded");

    let dossier = engine
        .dossiers
        .find_by_id(dossier.id())
        .await
        .expect("lookup")
        .expect("dossier exists");
    let outcome = engine
        .evaluator
        .evaluate(&dossier)
        .await
        .expect("evaluation runs");
    assert_eq!(outcome.completed.len(), 3);
    assert!(outcome.failures.is_empty());

    // The burial order stays manual; finish it on the board.
    let mut board = TaskBoard::load(
        Arc::clone(&engine.tasks),
        Arc::clone(&engine.activity),
        Arc::clone(&engine.clock),
        BoardScope::Dossier(dossier.id()),
    )
    .await
    .expect("board loads");
    let burial_order = board
        .tasks()
        .iter()
        .find(|task| task.task_type().as_str() == "burial-order")
        .expect("burial order exists")
        .id();
    board
        .move_task(burial_order, BoardColumn::Done)
        .await
        .expect("manual completion");

    let open = engine
        .tasks
        .count_open_for_dossier(dossier.id())
        .await
        .expect("count");
    assert_eq!(open, 0);

    // The open-task gate now passes again.
    engine
        .gatekeeper
        .transition(TransitionRequest::new(
            dossier.id(),
            DossierStatus::UnderReview,
            staff(),
        ))
        .await
        .expect("transition to under_review");

    // Every observed status has exactly one history event with a matching
    // `to` field; the initial Created status has none.
    let history = engine
        .gatekeeper
        .history(dossier.id())
        .await
        .expect("history");
    let observed: Vec<DossierStatus> = history.iter().map(|event| event.to()).collect();
    assert_eq!(
        observed,
        vec![DossierStatus::InProgress, DossierStatus::UnderReview]
    );
    assert!(history.iter().all(|event| event.dossier_id() == dossier.id()));
}

#[tokio::test(flavor = "multi_thread")]
async fn board_filter_projects_without_mutating() {
    let engine = engine();
    let dossier = open_dossier(&engine, "RP-2026-0043", FlowKind::Repatriation).await;

    let board = TaskBoard::load(
        Arc::clone(&engine.tasks),
        Arc::clone(&engine.activity),
        Arc::clone(&engine.clock),
        BoardScope::Dossier(dossier.id()),
    )
    .await
    .expect("board loads");

    let all = board.tasks().len();
    let high_priority = board.filtered(&BoardFilter::new().with_priority(TaskPriority::High));

    assert_eq!(all, 4, "repatriation onboarding seeds four tasks");
    assert_eq!(high_priority.len(), 1, "only the embassy notification");
    assert_eq!(board.tasks().len(), all, "projection does not mutate");
}

#[tokio::test(flavor = "multi_thread")]
async fn review_round_trip_does_not_reseed() {
    let engine = engine();
    let dossier = open_dossier(&engine, "RP-2026-0044", FlowKind::Local).await;
    complete_all_tasks(&engine, &dossier).await;

    for target in [
        DossierStatus::InProgress,
        DossierStatus::UnderReview,
        DossierStatus::InProgress,
        DossierStatus::UnderReview,
    ] {
        complete_all_tasks(&engine, &dossier).await;
        engine
            .gatekeeper
            .transition(TransitionRequest::new(dossier.id(), target, staff()))
            .await
            .expect("transition succeeds");
    }

    let tasks = engine
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    let verify_tasks = tasks
        .iter()
        .filter(|task| task.task_type().as_str() == "registry-check")
        .count();
    assert_eq!(verify_tasks, 1, "re-entering Verify never duplicates");
}
