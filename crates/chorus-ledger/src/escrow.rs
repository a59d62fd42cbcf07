//! Equal-split payout arithmetic.
//!
//! Bounty funds move exactly once per prayer: a split payout at confirm, or
//! a full refund at cancel — never both, never neither. Splits use integer
//! floor division; the remainder is deliberately left on the record rather
//! than assigned to any party, and returns to the requester at close.

use chorus_types::AgentId;

/// Each claimer's equal share of a bounty: `floor(bounty / num_claimers)`.
///
/// Zero claimers yield a zero share (a confirm with no claimers disburses
/// nothing).
pub fn equal_share(bounty: u64, num_claimers: u8) -> u64 {
    if num_claimers == 0 {
        return 0;
    }
    bounty / num_claimers as u64
}

/// What remains on the record after paying every claimer an equal share.
pub fn undistributed_remainder(bounty: u64, num_claimers: u8) -> u64 {
    bounty - equal_share(bounty, num_claimers) * num_claimers as u64
}

/// The result of a confirm's disbursement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayoutSummary {
    /// Equal share paid to each credited claimer.
    pub per_claimer: u64,
    /// Wallets actually credited, in the order supplied by the caller.
    pub recipients: Vec<AgentId>,
    /// Total amount leaving the record.
    pub total_disbursed: u64,
    /// Floor-division remainder left on the record.
    pub remainder: u64,
}
