//! The Chorus prayer chain.
//!
//! This crate is the heart of Chorus. It provides:
//! - The record model: chain singleton, agents, prayers, claims
//! - Escrow arithmetic: equal-split payouts, refunds, storage deposits
//! - `ChainReader` / `ChainWriter` trait boundaries
//! - `InMemoryChain`, an atomic, serialized lifecycle engine for tests and
//!   embedding
//! - A pluggable [`TimeSource`] so staleness and expiry are testable
//!
//! Every operation is all-or-nothing: it validates against current record
//! state under a single write lock, then applies all of its record
//! mutations and fund movements together. Concurrent callers racing for
//! the same slot serialize on that lock; the loser observes the updated
//! state and fails with a typed error.

pub mod clock;
pub mod error;
pub mod escrow;
pub mod memory;
pub mod records;
pub mod traits;

pub use clock::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use error::ChainError;
pub use escrow::{equal_share, undistributed_remainder, PayoutSummary};
pub use memory::InMemoryChain;
pub use records::{
    AgentRecord, ChainInfo, ClaimRecord, PrayerRecord, AGENT_DEPOSIT, ANSWER_REPUTATION,
    CLAIM_DEPOSIT, CONFIRM_REPUTATION, PRAYER_DEPOSIT,
};
pub use traits::{ChainReader, ChainWriter};
