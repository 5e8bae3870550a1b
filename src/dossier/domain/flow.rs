//! Case flow classification.

use super::ParseFlowKindError;
use serde::{Deserialize, Serialize};

/// Which workflow a dossier follows.
///
/// The flow decides which template catalogue applies when seeding tasks.
/// `Unset` is a valid intake state for cases whose handling has not been
/// decided yet; no tasks are seeded for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Burial or cremation in the country of death.
    Local,
    /// Repatriation of the deceased to another country.
    Repatriation,
    /// The flow has not been decided yet.
    Unset,
}

impl FlowKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Repatriation => "repatriation",
            Self::Unset => "unset",
        }
    }
}

impl TryFrom<&str> for FlowKind {
    type Error = ParseFlowKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "local" => Ok(Self::Local),
            "repatriation" => Ok(Self::Repatriation),
            "unset" => Ok(Self::Unset),
            _ => Err(ParseFlowKindError(value.to_owned())),
        }
    }
}
