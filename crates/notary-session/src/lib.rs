//! Notary Session
//!
//! Converts a long-lived Ed25519 credential into a short-lived,
//! capability-scoped [`SessionAuthorization`] accepted by the signing
//! quorum. The credential never leaves this crate: the quorum presents a
//! challenge, the authorizer signs a canonical message derived from it, and
//! only the signature travels.
//!
//! The exchange is a plain request/response call. The authorizer refuses to
//! sign under-specified challenges (missing uri, expiration, or resource
//! list) and challenges that request abilities outside the originally
//! required capability set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Capability pairs (resource pattern + ability)
pub mod capability;

/// Quorum-issued session challenges
pub mod challenge;

/// Canonical challenge message construction
pub mod message;

/// The authorizer holding the credential, and the authorization it issues
pub mod authorizer;

pub use authorizer::{SessionAuthorization, SessionAuthorizer};
pub use capability::{Ability, Capability, ResourcePattern};
pub use challenge::SessionChallenge;
pub use message::canonical_challenge_message;

/// Session authorization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The quorum challenge omitted a mandatory field.
    #[error("Challenge is missing mandatory field: {0}")]
    MissingChallengeField(&'static str),

    /// The challenge requested an ability outside the required set.
    #[error("Challenge requests {requested} which is not in the required capability set")]
    ScopeEscalation {
        /// The capability the challenge tried to add.
        requested: String,
    },

    /// The challenge dropped or reordered part of the required capability
    /// set; silent narrowing is refused just like escalation.
    #[error("Challenge narrowed the required capability set: missing {missing}")]
    ScopeNarrowed {
        /// A required capability absent from the challenge.
        missing: String,
    },

    /// The challenge expiration could not be parsed as RFC3339.
    #[error("Invalid challenge expiration: {0}")]
    InvalidExpiration(String),

    /// The authorization signature failed verification.
    #[error("Authorization signature invalid: {0}")]
    InvalidSignature(String),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
