//! Task orchestration for Cortege.
//!
//! This module owns the template catalogue, the idempotent phase-entry
//! task seeder, and the auto-completion evaluator that retires tasks when
//! the underlying business facts change. The module follows hexagonal
//! architecture:
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
