//! `PostgreSQL` adapters for task persistence and fact queries.

mod facts;
mod models;
mod repository;
mod schema;

pub use facts::PostgresFactStore;
pub use repository::{PostgresTaskRepository, TaskPgPool};
