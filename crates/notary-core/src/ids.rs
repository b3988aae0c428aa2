//! Strongly typed pipeline identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a single pipeline run.
///
/// Session authorizations and signing jobs are scoped to a run; a job is
/// never reused across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(uuid::Uuid);

impl RunId {
    /// Create a fresh run identifier.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::random(), RunId::random());
    }
}
