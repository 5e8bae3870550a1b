//! Cortege: dossier lifecycle and task orchestration engine.
//!
//! This crate is the core of a funeral repatriation and local-burial
//! case-management system: it governs the legal status transitions of a
//! dossier through a fixed workflow, seeds the correct work items for
//! each lifecycle phase, auto-completes tasks when underlying business
//! facts change, and gates status advancement on open-task and
//! legal-hold conditions.
//!
//! # Architecture
//!
//! Cortege follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, fact
//!   sources, etc.)
//!
//! # Modules
//!
//! - [`dossier`]: Status state machine, transition gates, history, audit
//! - [`task`]: Template catalogue, idempotent seeding, auto-completion
//! - [`board`]: Kanban board state with optimistic moves and rollback

pub mod board;
pub mod dossier;
pub mod task;
