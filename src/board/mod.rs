//! Task board state for Cortege.
//!
//! This module holds the live task collection behind the Kanban view:
//! optimistic column moves with rollback, the append-only activity feed,
//! and pure filtering. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
