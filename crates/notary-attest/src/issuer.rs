//! The attestation issuer.

use crate::ledger::AttestationLedger;
use crate::record::{AttestationRecord, IssuedAttestation, SchemaUid, NO_EXPIRATION};
use crate::schema::{encode_record, RecordFields};
use crate::{AttestError, Result};
use std::sync::Arc;

/// Issues revocable, non-expiring attestations against a fixed schema.
pub struct AttestationIssuer {
    ledger: Arc<dyn AttestationLedger>,
    schema_uid: SchemaUid,
}

impl AttestationIssuer {
    /// Create an issuer for the given registered schema.
    pub fn new(ledger: Arc<dyn AttestationLedger>, schema_uid: SchemaUid) -> Self {
        Self { ledger, schema_uid }
    }

    /// Encode and submit one attestation.
    ///
    /// `count` and `holding` are taken wide so out-of-range inputs are a
    /// typed [`AttestError::Encoding`] refusal here, before any ledger
    /// call, rather than a ledger-level revert.
    ///
    /// Issuance is at-least-once: if the process dies after broadcast but
    /// before confirmation, the caller cannot distinguish "never landed"
    /// from "landed, receipt lost", and a retry may duplicate the record.
    pub async fn issue(
        &self,
        subject: &str,
        count: u64,
        holding: u128,
        recipient: &str,
    ) -> Result<IssuedAttestation> {
        let count = u8::try_from(count).map_err(|_| {
            AttestError::Encoding(format!("NumberOfAttestations {count} exceeds uint8 range"))
        })?;
        let holding = u64::try_from(holding).map_err(|_| {
            AttestError::Encoding(format!("TotalPortfolioHolding {holding} exceeds uint64 range"))
        })?;

        let data = encode_record(&RecordFields {
            agent_id: subject.to_string(),
            attestations: count,
            holding,
        });

        let record = AttestationRecord {
            schema_uid: self.schema_uid.clone(),
            subject: subject.to_string(),
            count,
            holding,
            recipient: recipient.to_string(),
            revocable: true,
            expiration: NO_EXPIRATION,
            data,
        };

        let issued = self.ledger.submit(&record).await?;
        tracing::info!(
            uid = %issued.uid,
            subject,
            count,
            holding,
            recipient,
            "Attestation issued"
        );
        Ok(issued)
    }
}
