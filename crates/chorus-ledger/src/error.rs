use thiserror::Error;

/// Errors produced by chain operations.
///
/// Every lifecycle transition fails with exactly one of these; no partial
/// state is ever observable after a failure. The variants fall into the
/// taxonomy of authorization (`NotRequester`, `NotClaimer`,
/// `CannotClaimOwn`), state (`NotOpen`, `NotClaimed`, `NotFulfilled`,
/// `CannotCancel`, `CannotClose`, `Expired`), capacity/uniqueness
/// (`AlreadyClaimed`, `AgentExists`, `AlreadyDelivered`, `HasClaimers`,
/// `InvalidMaxClaimers`), resource (`*NotFound`), and funds
/// (`InsufficientBalance`, `BalanceOverflow`) errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain is already initialized")]
    AlreadyInitialized,

    #[error("chain is not initialized")]
    NotInitialized,

    #[error("name of {len} bytes exceeds the {max}-byte limit")]
    NameTooLong { len: usize, max: usize },

    #[error("skills of {len} bytes exceeds the {max}-byte limit")]
    SkillsTooLong { len: usize, max: usize },

    #[error("exchange key cannot be all zeros")]
    InvalidExchangeKey,

    #[error("agent is already registered")]
    AgentExists,

    #[error("agent is not registered")]
    AgentNotFound,

    #[error("ttl of {ttl} seconds is outside (0, {max}]")]
    InvalidTtl { ttl: i64, max: i64 },

    #[error("max_claimers of {given} is outside [1, {max}]")]
    InvalidMaxClaimers { given: u8, max: u8 },

    #[error("prayer not found")]
    PrayerNotFound,

    #[error("claim not found")]
    ClaimNotFound,

    #[error("prayer is not open for claims")]
    NotOpen,

    #[error("prayer has no active claims")]
    NotClaimed,

    #[error("prayer is not fulfilled")]
    NotFulfilled,

    #[error("prayer has expired")]
    Expired,

    #[error("cannot claim your own prayer")]
    CannotClaimOwn,

    #[error("prayer is already claimed by this agent")]
    AlreadyClaimed,

    #[error("only the requester can perform this action")]
    NotRequester,

    #[error("not authorized (not the claimer, and the claim is not stale)")]
    NotClaimer,

    #[error("content has already been delivered to this claimer")]
    AlreadyDelivered,

    #[error("cannot cancel a prayer with active claims")]
    HasClaimers,

    #[error("can only cancel open prayers")]
    CannotCancel,

    #[error("prayer must be confirmed or cancelled to close")]
    CannotClose,

    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: u64, available: u64 },

    #[error("balance overflow")]
    BalanceOverflow,
}
