//! Service tests for optimistic board moves.

use std::sync::Arc;

use crate::board::{
    adapters::memory::InMemoryActivityFeed,
    domain::BoardError,
    services::TaskBoard,
};
use crate::dossier::domain::{CaseReference, Dossier, FlowKind};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{BoardColumn, BoardScope, CompletionSource, Task, TaskId, TemplateCatalog},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    services::TaskSeeder,
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;

type TestBoard<R> = TaskBoard<R, InMemoryActivityFeed, DefaultClock>;

async fn seeded_board(
    tasks: Arc<InMemoryTaskRepository>,
    feed: Arc<InMemoryActivityFeed>,
) -> (TestBoard<InMemoryTaskRepository>, Dossier) {
    let clock = Arc::new(DefaultClock);
    let catalog = Arc::new(TemplateCatalog::builtin().expect("builtin catalog"));
    let seeder = TaskSeeder::new(Arc::clone(&tasks), catalog, Arc::clone(&clock));

    let reference = CaseReference::new("RP-2026-0042").expect("valid reference");
    let dossier = Dossier::open(reference, FlowKind::Local, &*clock);
    seeder.seed(&dossier).await.expect("seeded");

    let board = TaskBoard::load(tasks, feed, clock, BoardScope::Dossier(dossier.id()))
        .await
        .expect("board loads");
    (board, dossier)
}

fn first_task(board: &TestBoard<InMemoryTaskRepository>) -> Task {
    board.tasks().first().expect("board has tasks").clone()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_appends_to_the_end_of_the_target_column() {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let feed = Arc::new(InMemoryActivityFeed::new());
    let (mut board, _dossier) = seeded_board(Arc::clone(&tasks), Arc::clone(&feed)).await;

    let moved = first_task(&board);
    let second = board
        .tasks()
        .get(1)
        .expect("second task exists")
        .clone();

    let position = board
        .move_task(moved.id(), BoardColumn::Doing)
        .await
        .expect("move succeeds");
    assert_eq!(position, 0, "first task in an empty column");

    let next = board
        .move_task(second.id(), BoardColumn::Doing)
        .await
        .expect("second move succeeds");
    assert_eq!(next, 1, "appended after the first, nothing shifted");

    let activities = feed.recorded().expect("activity feed");
    assert_eq!(activities.len(), 2);
    let activity = activities.first().expect("first activity");
    assert_eq!(activity.from_label, "To do");
    assert_eq!(activity.to_label, "In progress");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_onto_the_current_column_is_a_silent_no_op() {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let feed = Arc::new(InMemoryActivityFeed::new());
    let (mut board, _dossier) = seeded_board(Arc::clone(&tasks), Arc::clone(&feed)).await;

    let task = first_task(&board);
    let position = board
        .move_task(task.id(), BoardColumn::Todo)
        .await
        .expect("no-op succeeds");

    assert_eq!(position, task.position());
    assert!(feed.recorded().expect("activity feed").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocked_tasks_cannot_be_moved() {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let feed = Arc::new(InMemoryActivityFeed::new());
    let (mut board, _dossier) = seeded_board(Arc::clone(&tasks), Arc::clone(&feed)).await;

    let mut task = first_task(&board);
    task.block("waiting on municipality");
    tasks.update(&task).await.expect("task updated");
    board.refresh().await.expect("board refreshed");

    let result = board.move_task(task.id(), BoardColumn::Doing).await;
    assert!(matches!(result, Err(BoardError::TaskBlocked { .. })));

    let unchanged = first_task(&board);
    assert_eq!(unchanged.column(), BoardColumn::Todo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_into_done_records_manual_completion() {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let feed = Arc::new(InMemoryActivityFeed::new());
    let (mut board, dossier) = seeded_board(Arc::clone(&tasks), Arc::clone(&feed)).await;

    let task = first_task(&board);
    board
        .move_task(task.id(), BoardColumn::Done)
        .await
        .expect("move succeeds");

    let stored = tasks
        .find_by_id(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.column(), BoardColumn::Done);
    assert!(matches!(
        stored.completion().map(|completion| &completion.source),
        Some(CompletionSource::Manual)
    ));

    let open = tasks
        .count_open_for_dossier(dossier.id())
        .await
        .expect("count");
    assert_eq!(open, 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_rejected() {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let feed = Arc::new(InMemoryActivityFeed::new());
    let (mut board, _dossier) = seeded_board(tasks, feed).await;

    let result = board.move_task(TaskId::new(), BoardColumn::Doing).await;
    assert!(matches!(result, Err(BoardError::TaskNotFound(_))));
}

/// Repository whose updates always fail, driving the rollback path.
#[derive(Clone, Default)]
struct UpdateFailingTaskRepository {
    inner: InMemoryTaskRepository,
}

#[async_trait]
impl TaskRepository for UpdateFailingTaskRepository {
    async fn insert_batch(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        self.inner.insert_batch(batch).await
    }

    async fn update(&self, _task: &Task) -> TaskRepositoryResult<()> {
        Err(TaskRepositoryError::persistence(std::io::Error::other(
            "write timed out",
        )))
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
async fn failed_persistence_rolls_back_the_optimistic_move() {
    let failing = Arc::new(UpdateFailingTaskRepository::default());
    let feed = Arc::new(InMemoryActivityFeed::new());
    let clock = Arc::new(DefaultClock);
    let catalog = Arc::new(TemplateCatalog::builtin().expect("builtin catalog"));
    let seeder = TaskSeeder::new(Arc::clone(&failing), catalog, Arc::clone(&clock));

    let reference = CaseReference::new("RP-2026-0042").expect("valid reference");
    let dossier = Dossier::open(reference, FlowKind::Local, &*clock);
    seeder.seed(&dossier).await.expect("seeded");

    let mut board = TaskBoard::load(
        Arc::clone(&failing),
        Arc::clone(&feed),
        clock,
        BoardScope::Dossier(dossier.id()),
    )
    .await
    .expect("board loads");

    let before: Vec<Task> = board.tasks().to_vec();
    let task_id = before.first().expect("board has tasks").id();

    let result = board.move_task(task_id, BoardColumn::Doing).await;
    assert!(matches!(result, Err(BoardError::Persistence(_))));

    assert_eq!(board.tasks(), before.as_slice(), "visible state restored");
    assert!(feed.recorded().expect("activity feed").is_empty());
}
