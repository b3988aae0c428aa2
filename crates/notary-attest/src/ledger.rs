//! The attestation ledger seam.
//!
//! Transaction transport (wallet, provider, gas) lives behind this trait;
//! the issuer only sees confirmed uids and transaction hashes.

use crate::record::{AttestationRecord, AttestationUid, IssuedAttestation};
use crate::{AttestError, Result};
use async_trait::async_trait;
use sha2::{Digest as _, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// A ledger that records schema-typed attestations.
#[async_trait]
pub trait AttestationLedger: Send + Sync {
    /// Broadcast the record and wait for confirmation.
    ///
    /// One state-changing transaction per call. Failures (insufficient
    /// funds, nonce conflict, network rejection) surface as
    /// [`AttestError::Submission`]; the ledger does not retry.
    async fn submit(&self, record: &AttestationRecord) -> Result<IssuedAttestation>;
}

/// In-process ledger used by tests and local runs.
///
/// Assigns deterministic uids derived from the record contents and a
/// per-ledger sequence number, and counts submissions so tests can assert
/// that range violations never reach the ledger.
#[derive(Default)]
pub struct MemoryLedger {
    sequence: AtomicU64,
    submissions: AtomicU64,
    fail_next: AtomicBool,
    records: Mutex<Vec<(AttestationUid, AttestationRecord)>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total submit calls observed, including failed ones.
    pub fn submission_count(&self) -> u64 {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Make the next submission fail (test hook for nonce conflicts and
    /// the like).
    pub fn fail_next_submission(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Fetch a stored record by uid.
    pub fn record(&self, uid: &AttestationUid) -> Option<AttestationRecord> {
        self.records
            .lock()
            .ok()?
            .iter()
            .find(|(stored_uid, _)| stored_uid == uid)
            .map(|(_, record)| record.clone())
    }
}

#[async_trait]
impl AttestationLedger for MemoryLedger {
    async fn submit(&self, record: &AttestationRecord) -> Result<IssuedAttestation> {
        self.submissions.fetch_add(1, Ordering::SeqCst);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AttestError::Submission(
                "nonce conflict: transaction replaced".to_string(),
            ));
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let mut hasher = Sha256::new();
        hasher.update(record.schema_uid.as_str().as_bytes());
        hasher.update(&record.data);
        hasher.update(record.recipient.as_bytes());
        hasher.update(sequence.to_be_bytes());
        let digest = hasher.finalize();

        let uid = AttestationUid::new(format!("0x{}", hex::encode(digest)));
        let tx_hash = format!("0x{}", hex::encode(&digest[..20]));

        self.records
            .lock()
            .map_err(|_| AttestError::Submission("ledger state poisoned".to_string()))?
            .push((uid.clone(), record.clone()));

        Ok(IssuedAttestation { uid, tx_hash })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{SchemaUid, NO_EXPIRATION};

    fn record() -> AttestationRecord {
        AttestationRecord {
            schema_uid: SchemaUid::new("0xschema"),
            subject: "agent-42".to_string(),
            count: 1,
            holding: 10,
            recipient: "0xabc".to_string(),
            revocable: true,
            expiration: NO_EXPIRATION,
            data: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn submissions_get_unique_uids() {
        let ledger = MemoryLedger::new();
        let first = ledger.submit(&record()).await.unwrap();
        let second = ledger.submit(&record()).await.unwrap();
        assert_ne!(first.uid, second.uid);
        assert_eq!(ledger.submission_count(), 2);
    }

    #[tokio::test]
    async fn injected_failure_surfaces_as_submission_error() {
        let ledger = MemoryLedger::new();
        ledger.fail_next_submission();
        assert!(matches!(
            ledger.submit(&record()).await,
            Err(AttestError::Submission(_))
        ));
        // The following submission succeeds again.
        ledger.submit(&record()).await.unwrap();
    }
}
