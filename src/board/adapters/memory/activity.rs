//! In-memory activity feed for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::TaskMovedActivity,
    ports::{ActivityFeed, ActivityFeedError, ActivityFeedResult},
};

/// Thread-safe in-memory activity feed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityFeed {
    records: Arc<RwLock<Vec<TaskMovedActivity>>>,
}

impl InMemoryActivityFeed {
    /// Creates an empty in-memory feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded moves, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityFeedError::Persistence`] when the lock is
    /// poisoned.
    pub fn recorded(&self) -> ActivityFeedResult<Vec<TaskMovedActivity>> {
        let records = self.records.read().map_err(|err| {
            ActivityFeedError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(records.clone())
    }
}

#[async_trait]
impl ActivityFeed for InMemoryActivityFeed {
    async fn record_move(&self, activity: &TaskMovedActivity) -> ActivityFeedResult<()> {
        let mut records = self.records.write().map_err(|err| {
            ActivityFeedError::persistence(std::io::Error::other(err.to_string()))
        })?;
        records.push(activity.clone());
        Ok(())
    }
}
