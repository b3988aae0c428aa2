//! ABI codec for the registered attestation schema.
//!
//! The schema is `string AgentId, uint8 NumberOfAttestations,
//! uint64 TotalPortfolioHolding`: declared order and widths must match
//! the on-chain registration exactly. Encoding follows the canonical ABI
//! layout: a three-word head (dynamic-string offset, padded uint8, padded
//! uint64) followed by the string's length word and right-padded bytes.

use crate::{AttestError, Result};

/// The registered schema declaration, verbatim.
pub const SCHEMA_DECLARATION: &str =
    "string AgentId, uint8 NumberOfAttestations, uint64 TotalPortfolioHolding";

const WORD: usize = 32;
/// Offset of the string tail: three head words.
const STRING_OFFSET: u64 = 96;

/// The three schema fields in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    /// `AgentId`: subject identifier.
    pub agent_id: String,
    /// `NumberOfAttestations`: bounded 8-bit counter.
    pub attestations: u8,
    /// `TotalPortfolioHolding`: 64-bit holding value.
    pub holding: u64,
}

fn push_word_u64(out: &mut Vec<u8>, value: u64) {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    out.extend_from_slice(&word);
}

/// Encode the fields per the schema layout.
pub fn encode_record(fields: &RecordFields) -> Vec<u8> {
    let string_bytes = fields.agent_id.as_bytes();
    let padded_len = string_bytes.len().div_ceil(WORD) * WORD;

    let mut out = Vec::with_capacity(4 * WORD + padded_len);
    push_word_u64(&mut out, STRING_OFFSET);
    push_word_u64(&mut out, u64::from(fields.attestations));
    push_word_u64(&mut out, fields.holding);
    push_word_u64(&mut out, string_bytes.len() as u64);
    out.extend_from_slice(string_bytes);
    out.resize(4 * WORD + padded_len, 0);
    out
}

fn read_word_u64(data: &[u8], word_index: usize) -> Result<u64> {
    let start = word_index * WORD;
    let word = data
        .get(start..start + WORD)
        .ok_or_else(|| AttestError::Encoding(format!("payload truncated at word {word_index}")))?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AttestError::Encoding(format!(
            "word {word_index} exceeds 64 bits"
        )));
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(bytes))
}

/// Decode an encoded payload back into its fields.
pub fn decode_record(data: &[u8]) -> Result<RecordFields> {
    let offset = read_word_u64(data, 0)?;
    if offset != STRING_OFFSET {
        return Err(AttestError::Encoding(format!(
            "unexpected string offset {offset}"
        )));
    }

    let attestations = read_word_u64(data, 1)?;
    let attestations = u8::try_from(attestations)
        .map_err(|_| AttestError::Encoding(format!("uint8 field holds {attestations}")))?;
    let holding = read_word_u64(data, 2)?;

    let length = read_word_u64(data, 3)? as usize;
    let start = 4 * WORD;
    let string_bytes = data
        .get(start..start + length)
        .ok_or_else(|| AttestError::Encoding("string tail truncated".to_string()))?;
    let agent_id = String::from_utf8(string_bytes.to_vec())
        .map_err(|e| AttestError::Encoding(format!("string field is not UTF-8: {e}")))?;

    Ok(RecordFields {
        agent_id,
        attestations,
        holding,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_in_declared_order() {
        let fields = RecordFields {
            agent_id: "agent-42".to_string(),
            attestations: 3,
            holding: 1_000_000,
        };
        let encoded = encode_record(&fields);
        assert_eq!(decode_record(&encoded).unwrap(), fields);
    }

    #[test]
    fn layout_is_the_canonical_abi_shape() {
        let fields = RecordFields {
            agent_id: "agent-42".to_string(),
            attestations: 3,
            holding: 1_000_000,
        };
        let encoded = encode_record(&fields);

        // Head words: offset 0x60, then the two integers right-aligned.
        assert_eq!(encoded.len(), 160);
        assert_eq!(encoded[31], 0x60);
        assert_eq!(encoded[63], 3);
        assert_eq!(&encoded[88..96], &1_000_000u64.to_be_bytes());
        // Tail: length word then the string bytes, zero-padded.
        assert_eq!(encoded[127], 8);
        assert_eq!(&encoded[128..136], b"agent-42");
        assert!(encoded[136..].iter().all(|b| *b == 0));
    }

    #[test]
    fn empty_subject_encodes_cleanly() {
        let fields = RecordFields {
            agent_id: String::new(),
            attestations: 0,
            holding: 0,
        };
        let encoded = encode_record(&fields);
        assert_eq!(encoded.len(), 128);
        assert_eq!(decode_record(&encoded).unwrap(), fields);
    }

    #[test]
    fn exact_word_length_subject_round_trips() {
        let fields = RecordFields {
            agent_id: "a".repeat(32),
            attestations: 255,
            holding: u64::MAX,
        };
        let encoded = encode_record(&fields);
        assert_eq!(decode_record(&encoded).unwrap(), fields);
    }

    #[test]
    fn rejects_oversized_uint8_word() {
        let fields = RecordFields {
            agent_id: "x".to_string(),
            attestations: 1,
            holding: 1,
        };
        let mut encoded = encode_record(&fields);
        encoded[62] = 1; // 256 in the uint8 word
        assert!(matches!(
            decode_record(&encoded),
            Err(AttestError::Encoding(_))
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let fields = RecordFields {
            agent_id: "agent-42".to_string(),
            attestations: 3,
            holding: 1_000_000,
        };
        let encoded = encode_record(&fields);
        assert!(matches!(
            decode_record(&encoded[..100]),
            Err(AttestError::Encoding(_))
        ));
    }
}
