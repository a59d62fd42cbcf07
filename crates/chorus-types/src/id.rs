use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Wallet identity of a Chorus participant.
///
/// An `AgentId` is the raw 32-byte Ed25519 public key of the participant's
/// wallet. It is the identity under which prayers are posted, claimed, and
/// answered, and the key against which all authorization checks run. The
/// all-zero id ([`AgentId::ZERO`]) is reserved as the "unset" sentinel, used
/// for a prayer's answerer slot before any answer arrives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId([u8; 32]);

impl AgentId {
    /// The all-zero sentinel id. Never a valid wallet.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create from raw public key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns `true` for the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("ag:{}", hex::encode(&self.0[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `ag:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("ag:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.short_id())
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}

/// Chain-assigned identifier of a prayer.
///
/// Prayer ids are handed out by the chain singleton's monotonic counter at
/// post time, so they are dense, strictly increasing, and never reused —
/// even after the underlying record is closed and its storage reclaimed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrayerId(u64);

impl PrayerId {
    /// Create from a raw id value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Little-endian byte encoding, as consumed by record addressing.
    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl From<u64> for PrayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for PrayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrayerId({})", self.0)
    }
}

impl fmt::Display for PrayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prayer#{}", self.0)
    }
}
