use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{AgentId, PrayerId};

/// Deterministic storage location of a Chorus record.
///
/// Every record's address is a domain-separated BLAKE3 hash over stable,
/// public inputs: a fixed tag plus the identifying fields of the record.
/// Any party can recompute any address and check a record's existence
/// without a directory service or a central allocator.
///
/// There is deliberately no reverse index: enumerating all claims of a
/// prayer requires a caller-supplied candidate list, each entry of which
/// can be verified against its recomputed claim address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordAddress([u8; 32]);

const CHAIN_TAG: &str = "chorus-chain-v1";
const AGENT_TAG: &str = "chorus-agent-v1";
const PRAYER_TAG: &str = "chorus-prayer-v1";
const CLAIM_TAG: &str = "chorus-claim-v1";

impl RecordAddress {
    /// Address of the chain singleton.
    pub fn chain() -> Self {
        Self(derive(CHAIN_TAG, &[]))
    }

    /// Address of an agent record, from the wallet public key.
    pub fn agent(wallet: &AgentId) -> Self {
        Self(derive(AGENT_TAG, &[wallet.as_bytes()]))
    }

    /// Address of a prayer record, from the prayer id.
    pub fn prayer(id: PrayerId) -> Self {
        Self(derive(PRAYER_TAG, &[&id.to_le_bytes()]))
    }

    /// Address of a claim record, from the prayer id and the claimer wallet.
    pub fn claim(id: PrayerId, claimer: &AgentId) -> Self {
        Self(derive(CLAIM_TAG, &[&id.to_le_bytes(), claimer.as_bytes()]))
    }

    /// The raw 32-byte address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn derive(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(tag.as_bytes());
    for part in parts {
        hasher.update(b":");
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

impl fmt::Debug for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordAddress({})", &self.to_hex()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn chain_address_is_deterministic() {
        assert_eq!(RecordAddress::chain(), RecordAddress::chain());
    }

    #[test]
    fn agent_address_depends_on_wallet() {
        let a = RecordAddress::agent(&AgentId::from_bytes([1; 32]));
        let b = RecordAddress::agent(&AgentId::from_bytes([2; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn prayer_address_depends_on_id() {
        let a = RecordAddress::prayer(PrayerId::new(0));
        let b = RecordAddress::prayer(PrayerId::new(1));
        assert_ne!(a, b);
    }

    #[test]
    fn claim_address_depends_on_both_inputs() {
        let wallet = AgentId::from_bytes([3; 32]);
        let other = AgentId::from_bytes([4; 32]);
        let a = RecordAddress::claim(PrayerId::new(5), &wallet);
        assert_ne!(a, RecordAddress::claim(PrayerId::new(6), &wallet));
        assert_ne!(a, RecordAddress::claim(PrayerId::new(5), &other));
    }

    #[test]
    fn record_kinds_never_collide() {
        // An agent record and a prayer record built from overlapping input
        // bytes must land at different addresses.
        let wallet = AgentId::from_bytes([0; 32]);
        let addrs = [
            RecordAddress::chain(),
            RecordAddress::agent(&wallet),
            RecordAddress::prayer(PrayerId::new(0)),
            RecordAddress::claim(PrayerId::new(0), &wallet),
        ];
        for (i, a) in addrs.iter().enumerate() {
            for b in addrs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn anyone_can_recompute() {
        // Two independent derivations from the same public inputs agree.
        let wallet = AgentId::from_bytes([9; 32]);
        let first = RecordAddress::claim(PrayerId::new(77), &wallet);
        let second = RecordAddress::claim(PrayerId::new(77), &wallet);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn distinct_prayer_ids_get_distinct_addresses(a in any::<u64>(), b in any::<u64>()) {
            prop_assume!(a != b);
            prop_assert_ne!(
                RecordAddress::prayer(PrayerId::new(a)),
                RecordAddress::prayer(PrayerId::new(b))
            );
        }

        #[test]
        fn distinct_wallets_get_distinct_agent_addresses(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            prop_assume!(a != b);
            prop_assert_ne!(
                RecordAddress::agent(&AgentId::from_bytes(a)),
                RecordAddress::agent(&AgentId::from_bytes(b))
            );
        }
    }
}
