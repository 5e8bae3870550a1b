//! Service tests for idempotent task seeding.

use std::sync::Arc;

use crate::dossier::domain::{CaseReference, Dossier, DossierStatus, FlowKind};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{BoardColumn, BoardScope, Task, TaskId, TemplateCatalog},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    services::TaskSeeder,
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestSeeder = TaskSeeder<InMemoryTaskRepository, DefaultClock>;

struct Harness {
    seeder: TestSeeder,
    tasks: Arc<InMemoryTaskRepository>,
    clock: Arc<DefaultClock>,
}

#[fixture]
fn harness() -> Harness {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    let catalog = Arc::new(TemplateCatalog::builtin().expect("builtin catalog"));
    let seeder = TaskSeeder::new(Arc::clone(&tasks), catalog, Arc::clone(&clock));
    Harness {
        seeder,
        tasks,
        clock,
    }
}

fn local_dossier(clock: &DefaultClock) -> Dossier {
    let reference = CaseReference::new("RP-2026-0042").expect("valid reference");
    Dossier::open(reference, FlowKind::Local, clock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_creates_the_phase_task_set(harness: Harness) {
    let dossier = local_dossier(&harness.clock);

    let created = harness.seeder.seed(&dossier).await.expect("seed succeeds");
    assert_eq!(created, 3);

    let tasks = harness
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    let positions: Vec<i32> = tasks.iter().map(Task::position).collect();
    assert_eq!(positions, vec![0, 1, 2], "ascending from zero");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_seeding_creates_nothing(harness: Harness) {
    let dossier = local_dossier(&harness.clock);

    let first = harness.seeder.seed(&dossier).await.expect("first seed");
    let second = harness.seeder.seed(&dossier).await.expect("second seed");

    assert_eq!(first, 3);
    assert_eq!(second, 0);
    let tasks = harness
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    assert_eq!(tasks.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_seeding_never_duplicates(harness: Harness) {
    let dossier = local_dossier(&harness.clock);

    let seeds = (0..8).map(|_| {
        let seeder = harness.seeder.clone();
        let dossier = dossier.clone();
        tokio::spawn(async move { seeder.seed(&dossier).await })
    });
    let mut total = 0;
    for handle in seeds {
        total += handle
            .await
            .expect("join succeeds")
            .expect("seed succeeds");
    }

    assert_eq!(total, 3, "templates created exactly once across all racers");
    let tasks = harness
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    assert_eq!(tasks.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unset_flow_seeds_nothing(harness: Harness) {
    let reference = CaseReference::new("XX-2026-0001").expect("valid reference");
    let dossier = Dossier::open(reference, FlowKind::Unset, &*harness.clock);

    let created = harness.seeder.seed(&dossier).await.expect("seed succeeds");
    assert_eq!(created, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn positions_continue_after_the_current_todo_maximum(harness: Harness) {
    let mut dossier = local_dossier(&harness.clock);
    harness.seeder.seed(&dossier).await.expect("onboarding seeded");

    dossier.apply_status(DossierStatus::InProgress, &*harness.clock);
    let created = harness.seeder.seed(&dossier).await.expect("intake seeded");
    assert_eq!(created, 4);

    let tasks = harness
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    let max_position = tasks.iter().map(Task::position).max();
    assert_eq!(max_position, Some(6), "intake continues at 3..=6");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn phase_reentry_does_not_reseed_completed_tasks(harness: Harness) {
    let mut dossier = local_dossier(&harness.clock);
    dossier.apply_status(DossierStatus::UnderReview, &*harness.clock);
    harness.seeder.seed(&dossier).await.expect("verify seeded");

    let mut tasks = harness
        .tasks
        .list_for_dossier(dossier.id())
        .await
        .expect("task list");
    for task in &mut tasks {
        task.place(BoardColumn::Done, task.position(), &*harness.clock);
        harness.tasks.update(task).await.expect("task updated");
    }

    // A review round-trip re-enters the Verify phase.
    dossier.apply_status(DossierStatus::InProgress, &*harness.clock);
    dossier.apply_status(DossierStatus::UnderReview, &*harness.clock);
    let reseeded = harness.seeder.seed(&dossier).await.expect("reseed");
    assert_eq!(reseeded, 0, "satisfied tasks stay satisfied");
}

/// Repository that reports a duplicate task type on every batch insert,
/// simulating the unique-index rejection of a lost seeding race.
#[derive(Clone, Default)]
struct RacingTaskRepository {
    inner: InMemoryTaskRepository,
}

#[async_trait]
impl TaskRepository for RacingTaskRepository {
    async fn insert_batch(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        let Some(task) = batch.first() else {
            return Ok(());
        };
        let Some(dossier_id) = task.dossier_id() else {
            return Ok(());
        };
        Err(TaskRepositoryError::DuplicateTaskType {
            dossier_id,
            task_type: task.task_type().clone(),
        })
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.inner.update(task).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn list_for_dossier(
        &self,
        dossier_id: crate::dossier::domain::DossierId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.list_for_dossier(dossier_id).await
    }

    async fn list_for_scope(&self, scope: &BoardScope) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.list_for_scope(scope).await
    }

    async fn count_open_for_dossier(
        &self,
        dossier_id: crate::dossier::domain::DossierId,
    ) -> TaskRepositoryResult<usize> {
        self.inner.count_open_for_dossier(dossier_id).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_key_rejection_is_a_successful_no_op() {
    let tasks = Arc::new(RacingTaskRepository::default());
    let clock = Arc::new(DefaultClock);
    let catalog = Arc::new(TemplateCatalog::builtin().expect("builtin catalog"));
    let seeder = TaskSeeder::new(tasks, catalog, Arc::clone(&clock));

    let dossier = local_dossier(&clock);
    let created = seeder.seed(&dossier).await.expect("treated as no-op");
    assert_eq!(created, 0);
}
