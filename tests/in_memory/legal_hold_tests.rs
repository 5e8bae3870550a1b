//! Legal holds freezing the dossier workflow.

use super::helpers::{admin, complete_all_tasks, engine, open_dossier, staff};
use cortege::dossier::domain::{AuditAction, DossierStatus, FlowKind, GateError};
use cortege::dossier::ports::DossierRepository;
use cortege::dossier::services::{GatekeeperError, TransitionRequest};

#[tokio::test(flavor = "multi_thread")]
async fn held_dossier_refuses_every_transition() {
    let engine = engine();
    let dossier = open_dossier(&engine, "RP-2026-0077", FlowKind::Local).await;
    complete_all_tasks(&engine, &dossier).await;

    engine
        .gatekeeper
        .place_legal_hold(dossier.id(), &admin(), "coroner inquest pending")
        .await
        .expect("hold placed");

    for actor in [staff(), admin()] {
        for target in [
            DossierStatus::InProgress,
            DossierStatus::UnderReview,
            DossierStatus::Completed,
            DossierStatus::Closed,
        ] {
            let result = engine
                .gatekeeper
                .transition(
                    TransitionRequest::new(dossier.id(), target, actor.clone())
                        .with_reason("attempted during hold"),
                )
                .await;
            assert!(
                matches!(
                    result,
                    Err(GatekeeperError::Gate(GateError::LegalHold { .. }))
                ),
                "transition to {target:?} must fail under hold"
            );
        }
    }

    let stored = engine
        .dossiers
        .find_by_id(dossier.id())
        .await
        .expect("lookup")
        .expect("dossier exists");
    assert_eq!(stored.status(), DossierStatus::Created, "status unchanged");
    assert!(stored.is_on_legal_hold());
    assert_eq!(stored.legal_hold_reason(), Some("coroner inquest pending"));

    let history = engine
        .gatekeeper
        .history(dossier.id())
        .await
        .expect("history");
    assert!(history.is_empty(), "no transition ever committed");
}

#[tokio::test(flavor = "multi_thread")]
async fn hold_lifecycle_is_fully_audited() {
    let engine = engine();
    let dossier = open_dossier(&engine, "RP-2026-0078", FlowKind::Local).await;
    complete_all_tasks(&engine, &dossier).await;

    engine
        .gatekeeper
        .place_legal_hold(dossier.id(), &admin(), "estate dispute")
        .await
        .expect("hold placed");
    engine
        .gatekeeper
        .clear_legal_hold(dossier.id(), &admin(), "dispute settled")
        .await
        .expect("hold cleared");

    engine
        .gatekeeper
        .transition(TransitionRequest::new(
            dossier.id(),
            DossierStatus::InProgress,
            staff(),
        ))
        .await
        .expect("workflow resumes after clearing");

    let entries = engine.audit.recorded().expect("audit entries");
    let placed = entries
        .iter()
        .find(|entry| entry.action == AuditAction::LegalHoldPlaced)
        .expect("placement audited");
    let cleared = entries
        .iter()
        .find(|entry| entry.action == AuditAction::LegalHoldCleared)
        .expect("clearing audited");

    assert_eq!(placed.reason.as_deref(), Some("estate dispute"));
    assert_eq!(cleared.reason.as_deref(), Some("dispute settled"));
    assert_eq!(placed.target, dossier.id().to_string());
}
