//! Replication policy and deal lifecycle.

use serde::{Deserialize, Serialize};

/// Replication policy requested at upload time.
///
/// Thresholds are expressed in epochs of the target network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealParams {
    /// Number of replicas to maintain.
    pub num_copies: u32,
    /// Epochs of missed proofs before a repair deal is made.
    pub repair_threshold: u64,
    /// Requested deal duration in epochs.
    pub deal_duration: u64,
    /// Epochs before expiry at which deals are renewed.
    pub renew_threshold: u64,
    /// Preferred storage providers, if any.
    pub miners: Vec<String>,
    /// Target network name.
    pub network: String,
}

impl Default for DealParams {
    fn default() -> Self {
        Self {
            num_copies: 2,
            repair_threshold: 28_800,
            deal_duration: 518_400,
            renew_threshold: 240,
            miners: Vec::new(),
            network: "calibration".to_string(),
        }
    }
}

/// Durability state of an uploaded artifact.
///
/// Created `Pending`; the storage network moves it toward `Durable` as
/// deals finalize. The synchronous pipeline never waits for `Durable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealStatus {
    /// Uploaded; no deal finalized yet.
    Pending,
    /// Some, but fewer than the requested number of replicas are active.
    PartiallyDurable,
    /// The requested replica count is active.
    Durable,
}

impl DealStatus {
    /// Whether the requested replication has been reached.
    pub fn is_durable(self) -> bool {
        matches!(self, DealStatus::Durable)
    }
}
