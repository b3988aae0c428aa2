//! Notary Core
//!
//! Foundation types shared across the notary pipeline: content digests,
//! run identifiers, and timestamp helpers.
//!
//! Everything in this crate is pure and synchronous. Network-facing
//! behavior (fetching, signing, uploading, attesting) lives in the
//! component crates that build on these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Content digest type and digest computation
pub mod digest;

/// Run and artifact identifiers
pub mod ids;

/// Timestamp helpers for expirations and receipts
pub mod time;

pub use digest::{Digest, DigestError};
pub use ids::RunId;
pub use time::{now_rfc3339, unix_now};
