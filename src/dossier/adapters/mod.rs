//! Persistence adapters for the dossier module.
//!
//! - [`memory`]: thread-safe in-memory storage for unit testing
//! - [`postgres`]: production `PostgreSQL` persistence using Diesel

pub mod memory;
pub mod postgres;
