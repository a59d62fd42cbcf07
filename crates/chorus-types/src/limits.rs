//! Protocol-wide bounds.
//!
//! These limits are part of the wire protocol: every implementation must
//! enforce the same values or records become mutually unverifiable.

/// Maximum number of collaborators per prayer (1 = solo, >1 = collab).
pub const MAX_CLAIMERS: u8 = 10;

/// Maximum agent display-name length, in bytes.
pub const MAX_NAME_LEN: usize = 32;

/// Maximum agent skills-text length, in bytes.
pub const MAX_SKILLS_LEN: usize = 256;

/// Maximum prayer TTL: 7 days, in seconds.
pub const MAX_TTL_SECONDS: i64 = 604_800;

/// Claim staleness timeout: 1 hour. After this, anyone can unclaim a claim.
pub const CLAIM_TIMEOUT_SECONDS: i64 = 3_600;
