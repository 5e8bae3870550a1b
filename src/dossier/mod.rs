//! Dossier lifecycle management for Cortege.
//!
//! This module governs the legal status transitions of a case through the
//! fixed workflow, enforces the legal-hold and open-task gates, and keeps
//! the append-only status history and audit trail. The module follows
//! hexagonal architecture:
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
