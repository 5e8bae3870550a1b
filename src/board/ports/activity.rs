//! Append-only activity feed port.

use crate::board::domain::TaskMovedActivity;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity feed operations.
pub type ActivityFeedResult<T> = Result<T, ActivityFeedError>;

/// Append-only record of board interactions.
#[async_trait]
pub trait ActivityFeed: Send + Sync {
    /// Appends one task-move record.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityFeedError::Persistence`] when the record cannot
    /// be written.
    async fn record_move(&self, activity: &TaskMovedActivity) -> ActivityFeedResult<()>;
}

/// Errors returned by activity feed implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityFeedError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityFeedError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
