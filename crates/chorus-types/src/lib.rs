//! Foundation types for the Chorus prayer exchange.
//!
//! This crate provides the identity, status, and addressing types used
//! throughout the Chorus system. Every other Chorus crate depends on
//! `chorus-types`.
//!
//! # Key Types
//!
//! - [`AgentId`] — A participant's wallet identity (Ed25519 public key bytes)
//! - [`PrayerId`] — Chain-assigned monotonic prayer identifier
//! - [`PrayerKind`] / [`PrayerStatus`] — What a prayer asks for, and where it
//!   is in its lifecycle
//! - [`RecordAddress`] — Deterministic, lookup-free storage location for every
//!   record (BLAKE3 over fixed domain tags)
//! - [`limits`] — Protocol-wide bounds (claimer cap, name/skills caps, TTL cap)

pub mod address;
pub mod error;
pub mod id;
pub mod limits;
pub mod prayer;

pub use address::RecordAddress;
pub use error::TypeError;
pub use id::{AgentId, PrayerId};
pub use prayer::{PrayerKind, PrayerStatus};
