//! Cryptographic primitives for the Chorus prayer exchange.
//!
//! Three layers, all pure and stateless:
//!
//! - [`signer`] — Ed25519 wallet keys. A wallet's verifying key *is* its
//!   [`AgentId`](chorus_types::AgentId).
//! - [`exchange`] — Deterministic Ed25519 → X25519 derivation, so a signing
//!   wallet doubles as a key-exchange identity without a second key ceremony.
//! - [`sealed`] — Authenticated point-to-point encryption over the X25519
//!   shared secret (XChaCha20-Poly1305, `nonce ∥ ciphertext` blobs) under a
//!   fixed per-message transport budget.
//!
//! [`hasher`] provides the domain-separated BLAKE3 content hashing used for
//! the on-chain content and answer hashes. The chain only ever sees these
//! hashes and sealed blobs; plaintext stays with the participants.

pub mod exchange;
pub mod hasher;
pub mod sealed;
pub mod signer;

pub use exchange::{ExchangePublicKey, ExchangeSecretKey};
pub use hasher::ContentHasher;
pub use sealed::{open, seal, SealError, MAX_PLAINTEXT_LEN, NONCE_LEN, TAG_LEN, TRANSPORT_BUDGET};
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
