//! Capability pairs granted by a session authorization.
//!
//! A capability binds a resource pattern to a single ability. The
//! authorization's capability list must be a superset of every ability the
//! session exercises; the quorum refuses anything not listed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ability the quorum can be asked to exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Produce a threshold signature over a digest with a held key.
    SignDigest,
    /// Execute a signing job's logic on the quorum nodes.
    ExecuteJob,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ability::SignDigest => f.write_str("sign-digest"),
            Ability::ExecuteJob => f.write_str("execute-job"),
        }
    }
}

/// Pattern naming the resources an ability applies to.
///
/// `*` matches every resource; otherwise matching is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourcePattern(String);

impl ResourcePattern {
    /// Pattern matching every resource.
    pub fn wildcard() -> Self {
        Self("*".to_string())
    }

    /// Pattern matching exactly one resource.
    pub fn exact(resource: impl Into<String>) -> Self {
        Self(resource.into())
    }

    /// Whether this pattern covers the given resource name.
    pub fn matches(&self, resource: &str) -> bool {
        self.0 == "*" || self.0 == resource
    }

    /// Borrow the raw pattern.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A (resource pattern, ability) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    /// Resources this capability applies to.
    pub resource: ResourcePattern,
    /// Ability granted over those resources.
    pub ability: Ability,
}

impl Capability {
    /// Grant an ability over every resource.
    pub fn any(ability: Ability) -> Self {
        Self {
            resource: ResourcePattern::wildcard(),
            ability,
        }
    }

    /// Whether this capability permits `ability` on `resource`.
    pub fn permits(&self, ability: Ability, resource: &str) -> bool {
        self.ability == ability && self.resource.matches(resource)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.ability)
    }
}
