use serde::{Deserialize, Serialize};

use chorus_types::limits::CLAIM_TIMEOUT_SECONDS;
use chorus_types::{AgentId, PrayerId, PrayerKind, PrayerStatus};

/// Reputation earned for submitting an answer.
pub const ANSWER_REPUTATION: u64 = 10;

/// Reputation bonus when the requester confirms the answer.
pub const CONFIRM_REPUTATION: u64 = 5;

/// Storage deposit for an agent record. Agent records are never destroyed,
/// so this deposit is never refunded.
pub const AGENT_DEPOSIT: u64 = 3_000_000;

/// Storage deposit for a prayer record, returned to the requester at close.
pub const PRAYER_DEPOSIT: u64 = 2_000_000;

/// Storage deposit for a claim record, returned to the claimer when the
/// claim is removed.
pub const CLAIM_DEPOSIT: u64 = 1_000_000;

/// Global protocol state. One per chain, created by `initialize`.
///
/// The counters are a deliberate contention hotspot: every post, register,
/// and answer serializes on this record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub authority: AgentId,
    pub total_prayers: u64,
    pub total_answered: u64,
    pub total_agents: u64,
    pub created_at: i64,
}

impl ChainInfo {
    pub fn new(authority: AgentId, now: i64) -> Self {
        Self {
            authority,
            total_prayers: 0,
            total_answered: 0,
            total_agents: 0,
            created_at: now,
        }
    }
}

/// A registered participant: identity, encryption key, and reputation.
///
/// Created once by `register`, never destroyed. All counters mutate only as
/// side effects of lifecycle operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub wallet: AgentId,
    pub name: String,
    pub skills: String,
    /// X25519 public key for sealed-box deliveries to this agent.
    pub exchange_key: [u8; 32],
    pub prayers_posted: u64,
    pub prayers_answered: u64,
    pub prayers_confirmed: u64,
    pub reputation: u64,
    pub registered_at: i64,
}

impl AgentRecord {
    pub fn new(
        wallet: AgentId,
        name: String,
        skills: String,
        exchange_key: [u8; 32],
        now: i64,
    ) -> Self {
        Self {
            wallet,
            name,
            skills,
            exchange_key,
            prayers_posted: 0,
            prayers_answered: 0,
            prayers_confirmed: 0,
            reputation: 0,
            registered_at: now,
        }
    }
}

/// A posted request, holding its own escrow.
///
/// `escrow` is the record's current balance: the full bounty from post time
/// until the single terminal disbursement (split payout at confirm, refund
/// at cancel), then any floor-division remainder until close. Plaintext
/// never appears here — only the content hash and the sealed answer blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerRecord {
    pub id: PrayerId,
    pub requester: AgentId,
    pub kind: PrayerKind,
    pub content_hash: [u8; 32],
    /// Bounty deposited at post time. Immutable; payout math reads this.
    pub bounty: u64,
    /// Funds currently held by the record.
    pub escrow: u64,
    /// Storage deposit, returned at close.
    pub deposit: u64,
    pub status: PrayerStatus,
    pub max_claimers: u8,
    pub num_claimers: u8,
    /// `AgentId::ZERO` until an answer arrives.
    pub answerer: AgentId,
    pub answer_hash: [u8; 32],
    /// Sealed answer blob, addressed to the requester.
    pub encrypted_answer: Option<Vec<u8>>,
    pub created_at: i64,
    pub expires_at: i64,
    pub fulfilled_at: i64,
}

impl PrayerRecord {
    /// Advisory expiry check. The chain never acts on this; readers must
    /// treat an apparently-open record past expiry as practically dead.
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// One collaborator's claim on a prayer.
///
/// Created by `claim`, destroyed by `unclaim` — or swept when the parent
/// prayer is closed, since a claim must never outlive its prayer. Confirm
/// leaves claims in place: they prove membership in the payout set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub prayer_id: PrayerId,
    pub claimer: AgentId,
    /// Set once the requester has delivered sealed content to this claimer.
    pub content_delivered: bool,
    /// The sealed content blob, present once delivered.
    pub delivery: Option<Vec<u8>>,
    pub claimed_at: i64,
    /// Storage deposit, returned to the claimer when the claim is removed.
    pub deposit: u64,
}

impl ClaimRecord {
    pub fn new(prayer_id: PrayerId, claimer: AgentId, now: i64) -> Self {
        Self {
            prayer_id,
            claimer,
            content_delivered: false,
            delivery: None,
            claimed_at: now,
            deposit: CLAIM_DEPOSIT,
        }
    }

    /// A stale claim may be reaped by anyone via `unclaim`.
    pub fn is_stale(&self, now: i64) -> bool {
        now > self.claimed_at + CLAIM_TIMEOUT_SECONDS
    }
}
