//! `PostgreSQL` adapters for dossier lifecycle persistence.

mod models;
mod repository;
mod schema;

pub use repository::{DossierPgPool, PostgresAuditLog, PostgresDossierRepository};
