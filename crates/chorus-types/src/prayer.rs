use std::fmt;

use serde::{Deserialize, Serialize};

/// What a prayer asks its collaborators for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerKind {
    /// Information or analysis.
    Knowledge,
    /// Processing or execution.
    Compute,
    /// Verification or red-teaming.
    Review,
    /// A data feed or alert.
    Signal,
    /// A partner for a task.
    Collaboration,
}

impl fmt::Display for PrayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Knowledge => "knowledge",
            Self::Compute => "compute",
            Self::Review => "review",
            Self::Signal => "signal",
            Self::Collaboration => "collaboration",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle status of a prayer.
///
/// Status only advances forward, with one exception: `unclaim` may move a
/// prayer from `Active` back to `Open` when a slot frees up. Expiry is
/// advisory metadata on the record, never a status — readers check
/// `expires_at` themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrayerStatus {
    /// Accepting claims (until `max_claimers` is reached).
    Open,
    /// All slots filled, work in progress.
    Active,
    /// Answer submitted, awaiting the requester's confirmation.
    Fulfilled,
    /// Requester approved; bounty distributed. Terminal.
    Confirmed,
    /// Requester cancelled before any claim arrived. Terminal.
    Cancelled,
}

impl PrayerStatus {
    /// Terminal states admit no further transitions except `close`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Only `Open` prayers accept new claims.
    pub fn accepts_claims(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Claims are live (and answers/deliveries possible) while `Open` or
    /// `Active`.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::Open | Self::Active)
    }
}

impl fmt::Display for PrayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Active => "active",
            Self::Fulfilled => "fulfilled",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}
