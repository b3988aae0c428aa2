//! Canonical challenge message.
//!
//! The authorizer signs a deterministic text rendering of the challenge.
//! The quorum reconstructs the same text from the authorization's fields
//! when verifying, so any drift in uri, expiration, nonce, address, or the
//! capability list invalidates the signature.

use crate::capability::Capability;
use std::fmt::Write as _;

/// Render the canonical message for a challenge.
///
/// Layout follows the SIWE convention of one labelled line per field with
/// the capability list appended in order. The exact bytes of this rendering
/// are the signing contract between authorizer and quorum.
pub fn canonical_challenge_message(
    address: &str,
    uri: &str,
    expiration: &str,
    nonce: &str,
    capabilities: &[Capability],
) -> String {
    let mut message = String::new();
    // writeln! into a String cannot fail
    let _ = writeln!(message, "{address} wants to authorize a signing session");
    let _ = writeln!(message, "URI: {uri}");
    let _ = writeln!(message, "Expiration Time: {expiration}");
    let _ = writeln!(message, "Nonce: {nonce}");
    let _ = writeln!(message, "Resources:");
    for capability in capabilities {
        let _ = writeln!(message, "- {capability}");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Ability, Capability};

    #[test]
    fn message_embeds_every_field() {
        let caps = vec![
            Capability::any(Ability::SignDigest),
            Capability::any(Ability::ExecuteJob),
        ];
        let message = canonical_challenge_message(
            "aabbcc",
            "notary:session:1",
            "2026-01-01T00:00:00+00:00",
            "nonce-123",
            &caps,
        );
        assert!(message.contains("aabbcc"));
        assert!(message.contains("URI: notary:session:1"));
        assert!(message.contains("Expiration Time: 2026-01-01T00:00:00+00:00"));
        assert!(message.contains("Nonce: nonce-123"));
        assert!(message.contains("- *:sign-digest"));
        assert!(message.contains("- *:execute-job"));
    }

    #[test]
    fn capability_order_changes_message() {
        let forward = vec![
            Capability::any(Ability::SignDigest),
            Capability::any(Ability::ExecuteJob),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        let a = canonical_challenge_message("a", "u", "e", "n", &forward);
        let b = canonical_challenge_message("a", "u", "e", "n", &reversed);
        assert_ne!(a, b);
    }
}
