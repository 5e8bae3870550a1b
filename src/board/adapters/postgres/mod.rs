//! `PostgreSQL` adapters for board activity persistence.

mod feed;
mod schema;

pub use feed::PostgresActivityFeed;
