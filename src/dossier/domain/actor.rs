//! Acting-user identity attached to gated operations.

use super::DossierDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for the user requesting an operation.
///
/// Actor identifiers originate in the authentication layer; the domain
/// treats them as validated opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Creates a validated actor identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DossierDomainError::InvalidActorId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DossierDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DossierDomainError::InvalidActorId(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity and privilege level of the user behind a request.
///
/// Privileged actors may bypass the allowed-transition graph and the
/// open-task gate; they can never bypass a legal hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    privileged: bool,
}

impl Actor {
    /// Creates an actor with the given privilege level.
    #[must_use]
    pub const fn new(id: ActorId, privileged: bool) -> Self {
        Self { id, privileged }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub const fn id(&self) -> &ActorId {
        &self.id
    }

    /// Returns whether the actor holds admin-level override privileges.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.privileged
    }
}
