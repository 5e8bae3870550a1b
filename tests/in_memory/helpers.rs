//! Shared harness for in-memory integration tests.

use std::sync::Arc;

use cortege::board::adapters::memory::InMemoryActivityFeed;
use cortege::dossier::adapters::memory::{InMemoryAuditLog, InMemoryDossierRepository};
use cortege::dossier::domain::{Actor, ActorId, CaseReference, Dossier, FlowKind};
use cortege::dossier::services::TransitionGatekeeper;
use cortege::task::adapters::memory::{InMemoryFactStore, InMemoryTaskRepository};
use cortege::task::domain::{BoardColumn, TemplateCatalog};
use cortege::task::ports::TaskRepository;
use cortege::task::services::{AutoCompletionEvaluator, TaskSeeder};
use mockable::DefaultClock;

/// The gatekeeper type every integration test drives.
pub type TestGatekeeper = TransitionGatekeeper<
    InMemoryDossierRepository,
    InMemoryTaskRepository,
    InMemoryAuditLog,
    DefaultClock,
>;

/// The evaluator type every integration test drives.
pub type TestEvaluator =
    AutoCompletionEvaluator<InMemoryTaskRepository, InMemoryFactStore, DefaultClock>;

/// Fully wired engine over in-memory adapters.
pub struct Engine {
    /// Transition gatekeeper under test.
    pub gatekeeper: TestGatekeeper,
    /// Auto-completion evaluator under test.
    pub evaluator: TestEvaluator,
    /// Backing dossier repository.
    pub dossiers: Arc<InMemoryDossierRepository>,
    /// Backing task repository.
    pub tasks: Arc<InMemoryTaskRepository>,
    /// Backing fact store.
    pub facts: Arc<InMemoryFactStore>,
    /// Backing audit log.
    pub audit: Arc<InMemoryAuditLog>,
    /// Backing activity feed.
    pub activity: Arc<InMemoryActivityFeed>,
    /// Shared clock.
    pub clock: Arc<DefaultClock>,
}

/// Wires a complete engine over fresh in-memory adapters.
#[must_use]
pub fn engine() -> Engine {
    let dossiers = Arc::new(InMemoryDossierRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let facts = Arc::new(InMemoryFactStore::new());
    let audit = Arc::new(InMemoryAuditLog::new());
    let activity = Arc::new(InMemoryActivityFeed::new());
    let clock = Arc::new(DefaultClock);
    let catalog = Arc::new(TemplateCatalog::builtin().expect("builtin catalog"));

    let seeder = TaskSeeder::new(Arc::clone(&tasks), Arc::clone(&catalog), Arc::clone(&clock));
    let gatekeeper = TransitionGatekeeper::new(
        Arc::clone(&dossiers),
        Arc::clone(&tasks),
        Arc::clone(&audit),
        seeder,
        Arc::clone(&clock),
    );
    let evaluator = AutoCompletionEvaluator::new(
        Arc::clone(&tasks),
        Arc::clone(&facts),
        catalog,
        Arc::clone(&clock),
    );

    Engine {
        gatekeeper,
        evaluator,
        dossiers,
        tasks,
        facts,
        audit,
        activity,
        clock,
    }
}

/// Returns a non-privileged case-manager actor.
#[must_use]
pub fn staff() -> Actor {
    Actor::new(ActorId::new("case-manager").expect("valid actor id"), false)
}

/// Returns a privileged admin actor.
#[must_use]
pub fn admin() -> Actor {
    Actor::new(ActorId::new("ops-admin").expect("valid actor id"), true)
}

/// Opens a dossier with the given reference and flow.
pub async fn open_dossier(engine: &Engine, reference: &str, flow: FlowKind) -> Dossier {
    let reference = CaseReference::new(reference).expect("valid reference");
    engine
        .gatekeeper
        .open_dossier(reference, flow)
        .await
        .expect("dossier opened")
}

/// Marks every one of the dossier's tasks Done through the repository.
pub async fn complete_all_tasks(engine: &Engine, dossier: &Dossier) {
    let tasks = engine
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    for mut task in tasks {
        task.place(BoardColumn::Done, task.position(), &*engine.clock);
        engine.tasks.update(&task).await.expect("task updated");
    }
}
