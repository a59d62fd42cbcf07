use chorus_types::{AgentId, PrayerId, PrayerKind};

use crate::error::ChainError;
use crate::escrow::PayoutSummary;
use crate::records::{AgentRecord, ChainInfo, ClaimRecord, PrayerRecord};

/// Write boundary: the lifecycle transitions.
///
/// All implementations must satisfy these invariants:
/// - Every operation is atomic: all record mutations and fund movements
///   commit together, or none do.
/// - Failures are typed [`ChainError`] outcomes, never partial state.
/// - `num_claimers ≤ max_claimers` holds at all times.
/// - Escrowed funds leave a prayer exactly once, through `confirm` or
///   `cancel`; the floor-division remainder exits only at `close`.
/// - No operation is retried internally; callers may retry freely where
///   uniqueness checks make the operation naturally idempotent (a repeated
///   duplicate claim always fails the same way).
pub trait ChainWriter: Send + Sync {
    /// One-time chain setup. Fails `AlreadyInitialized` on a second call.
    fn initialize(&self, authority: AgentId) -> Result<(), ChainError>;

    /// Register a participant with a display name, free-text skills, and
    /// its X25519 exchange public key.
    fn register(
        &self,
        wallet: AgentId,
        name: &str,
        skills: &str,
        exchange_key: [u8; 32],
    ) -> Result<(), ChainError>;

    /// Post a prayer, escrowing `bounty` out of the requester's balance.
    /// Returns the chain-assigned prayer id.
    fn post(
        &self,
        requester: AgentId,
        kind: PrayerKind,
        content_hash: [u8; 32],
        bounty: u64,
        ttl_seconds: i64,
        max_claimers: u8,
    ) -> Result<PrayerId, ChainError>;

    /// Claim an open prayer. The final slot flips the status to Active.
    fn claim(&self, claimer: AgentId, prayer: PrayerId) -> Result<(), ChainError>;

    /// Deliver a sealed content blob to one claimer. Once per claimer.
    fn deliver_content(
        &self,
        caller: AgentId,
        prayer: PrayerId,
        claimer: AgentId,
        blob: Vec<u8>,
    ) -> Result<(), ChainError>;

    /// Submit a sealed answer. The answerer must hold a claim.
    fn answer(
        &self,
        answerer: AgentId,
        prayer: PrayerId,
        answer_hash: [u8; 32],
        encrypted_answer: Vec<u8>,
    ) -> Result<(), ChainError>;

    /// Confirm a fulfilled prayer and split the bounty equally among the
    /// supplied claimers. Listed wallets without a live claim are skipped;
    /// completeness of the list is the caller's responsibility, correctness
    /// of each individual payout is the chain's.
    fn confirm(
        &self,
        requester: AgentId,
        prayer: PrayerId,
        claimers: &[AgentId],
    ) -> Result<PayoutSummary, ChainError>;

    /// Cancel an unclaimed open prayer, refunding the full escrow.
    fn cancel(&self, requester: AgentId, prayer: PrayerId) -> Result<(), ChainError>;

    /// Remove a claim: voluntarily by its claimer, or by anyone once the
    /// claim has gone stale.
    fn unclaim(
        &self,
        caller: AgentId,
        prayer: PrayerId,
        claimer: AgentId,
    ) -> Result<(), ChainError>;

    /// Destroy a terminal prayer record, returning its storage deposit and
    /// any leftover escrow to the requester. Returns the amount refunded.
    fn close(&self, requester: AgentId, prayer: PrayerId) -> Result<u64, ChainError>;
}

/// Read boundary: the accessors the scheduling layer consumes.
pub trait ChainReader: Send + Sync {
    /// The chain singleton. Fails `NotInitialized` before `initialize`.
    fn chain_info(&self) -> Result<ChainInfo, ChainError>;

    /// An agent record, or `None` if the wallet never registered.
    fn agent(&self, wallet: &AgentId) -> Result<Option<AgentRecord>, ChainError>;

    /// A prayer record, or `None` if absent or already closed.
    fn prayer(&self, id: PrayerId) -> Result<Option<PrayerRecord>, ChainError>;

    /// A claim record, or `None` if absent or already removed.
    fn claim_record(
        &self,
        id: PrayerId,
        claimer: &AgentId,
    ) -> Result<Option<ClaimRecord>, ChainError>;

    /// A wallet's spendable balance.
    fn balance(&self, wallet: &AgentId) -> Result<u64, ChainError>;
}
