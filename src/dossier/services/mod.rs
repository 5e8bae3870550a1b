//! Application services for dossier lifecycle orchestration.

mod gatekeeper;

pub use gatekeeper::{
    GatekeeperError, GatekeeperResult, TransitionGatekeeper, TransitionRequest,
};
