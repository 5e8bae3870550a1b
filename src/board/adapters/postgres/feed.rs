//! `PostgreSQL` adapter for the board activity feed.

use super::schema::task_activities;
use crate::board::{
    domain::TaskMovedActivity,
    ports::{ActivityFeed, ActivityFeedError, ActivityFeedResult},
};
use crate::dossier::domain::DossierId;
use crate::task::adapters::postgres::TaskPgPool;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Insert model for activity records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_activities)]
struct NewActivityRow {
    id: uuid::Uuid,
    task_id: uuid::Uuid,
    dossier_id: Option<uuid::Uuid>,
    from_stage: String,
    from_label: String,
    to_stage: String,
    to_label: String,
    recorded_at: DateTime<Utc>,
}

/// `PostgreSQL`-backed activity feed.
#[derive(Debug, Clone)]
pub struct PostgresActivityFeed {
    pool: TaskPgPool,
}

impl PostgresActivityFeed {
    /// Creates a new feed from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityFeed for PostgresActivityFeed {
    async fn record_move(&self, activity: &TaskMovedActivity) -> ActivityFeedResult<()> {
        let row = NewActivityRow {
            id: activity.id,
            task_id: TaskId::into_inner(activity.task_id),
            dossier_id: activity.dossier_id.map(DossierId::into_inner),
            from_stage: activity.from.as_str().to_owned(),
            from_label: activity.from_label.clone(),
            to_stage: activity.to.as_str().to_owned(),
            to_label: activity.to_label.clone(),
            recorded_at: activity.recorded_at,
        };
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ActivityFeedError::persistence)?;
            diesel::insert_into(task_activities::table)
                .values(&row)
                .execute(&mut connection)
                .map_err(ActivityFeedError::persistence)?;
            Ok(())
        })
        .await
        .map_err(ActivityFeedError::persistence)?
    }
}
