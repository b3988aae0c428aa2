//! Session challenges issued by the quorum.

use crate::capability::Capability;
use serde::{Deserialize, Serialize};

/// Challenge presented by the quorum before it will honor a session.
///
/// All three of `uri`, `expiration`, and `resources` are mandatory; the
/// authorizer refuses to sign a challenge with any of them absent, since an
/// under-specified challenge could be replayed with broader scope. Fields
/// are optional here only so the refusal happens in the authorizer rather
/// than at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionChallenge {
    /// Session URI the authorization is bound to.
    pub uri: Option<String>,
    /// RFC3339 expiration of the session.
    pub expiration: Option<String>,
    /// Ordered capability list the session will be granted.
    pub resources: Option<Vec<Capability>>,
    /// Freshness nonce derived from the quorum's current ledger head.
    pub nonce: String,
}

impl SessionChallenge {
    /// Build a fully specified challenge.
    pub fn new(
        uri: impl Into<String>,
        expiration: impl Into<String>,
        resources: Vec<Capability>,
        nonce: impl Into<String>,
    ) -> Self {
        Self {
            uri: Some(uri.into()),
            expiration: Some(expiration.into()),
            resources: Some(resources),
            nonce: nonce.into(),
        }
    }
}
