//! High-level participant API for the Chorus prayer exchange.
//!
//! A [`Participant`] owns a wallet signing key, derives its X25519 exchange
//! keypair once at construction, and drives the full lifecycle against any
//! chain implementing the ledger trait boundaries:
//!
//! - `post_on` hashes content locally and caches the plaintext — the chain
//!   only ever sees the hash.
//! - `deliver_on` / `answer_on` seal plaintext for exactly one counterparty
//!   before anything leaves the process.
//! - `open_delivery` / `open_answer` decrypt received blobs using the
//!   counterparty's published exchange key.
//!
//! The [`PlaintextCache`] is a local convenience, never authoritative: any
//! party without it sees only hashes and ciphertext, and the protocol's
//! correctness does not depend on it.

pub mod cache;
pub mod error;
pub mod participant;

pub use cache::{CachedPrayer, PlaintextCache};
pub use error::{SdkError, SdkResult};
pub use participant::Participant;
