use thiserror::Error;

use chorus_crypto::SealError;
use chorus_ledger::ChainError;
use chorus_types::{AgentId, PrayerId};

/// Result alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors produced by the participant facade.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdkError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("sealed-box error: {0}")]
    Seal(#[from] SealError),

    #[error("agent {0} is not registered")]
    AgentMissing(AgentId),

    #[error("{0} not found on chain")]
    PrayerMissing(PrayerId),

    #[error("no cached plaintext for {0}")]
    ContentMissing(PrayerId),

    #[error("no content has been delivered to this claimer for {0}")]
    NoDelivery(PrayerId),

    #[error("{0} has no answer yet")]
    NoAnswer(PrayerId),

    #[error("content of {len} bytes exceeds the {max}-byte sealed-box budget")]
    ContentTooLong { len: usize, max: usize },

    #[error("decrypted payload is not valid utf-8")]
    NotText,
}
