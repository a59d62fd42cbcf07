use tracing::debug;

use chorus_crypto::{
    seal, ContentHasher, ExchangePublicKey, ExchangeSecretKey, SigningKey, MAX_PLAINTEXT_LEN,
};
use chorus_ledger::{ChainReader, ChainWriter, PayoutSummary};
use chorus_types::{AgentId, PrayerId, PrayerKind};

use crate::cache::PlaintextCache;
use crate::error::{SdkError, SdkResult};

/// One participant's view of the prayer exchange.
///
/// Owns the wallet signing key and the exchange keypair derived from it,
/// plus a local plaintext cache. All chain access goes through the
/// [`ChainReader`] / [`ChainWriter`] boundaries, so the same participant
/// drives an in-memory chain in tests and a remote one in production.
pub struct Participant {
    name: String,
    signing: SigningKey,
    exchange: ExchangeSecretKey,
    cache: PlaintextCache,
}

impl Participant {
    /// Create a participant with a fresh random wallet.
    pub fn new(name: &str) -> Self {
        Self::from_signing_key(name, SigningKey::generate())
    }

    /// Create a participant from an existing wallet key.
    pub fn from_signing_key(name: &str, signing: SigningKey) -> Self {
        let exchange = ExchangeSecretKey::derive(&signing);
        Self {
            name: name.to_string(),
            signing,
            exchange,
            cache: PlaintextCache::new(),
        }
    }

    /// The wallet identity.
    pub fn id(&self) -> AgentId {
        self.signing.agent_id()
    }

    /// The exchange public key other agents seal blobs to.
    pub fn exchange_public(&self) -> ExchangePublicKey {
        self.exchange.public_key()
    }

    /// The local plaintext cache.
    pub fn cache(&self) -> &PlaintextCache {
        &self.cache
    }

    /// Register this wallet on the chain, publishing the exchange key.
    pub fn register_on<C: ChainWriter>(&self, chain: &C, skills: &str) -> SdkResult<()> {
        chain.register(
            self.id(),
            &self.name,
            skills,
            self.exchange.public_key().to_bytes(),
        )?;
        Ok(())
    }

    /// Post a prayer. The chain receives only the content hash; the
    /// plaintext goes into the local cache for later delivery.
    ///
    /// Content is bounded by the sealed-box budget up front, since it must
    /// eventually fit a single delivery blob per claimer.
    pub fn post_on<C: ChainWriter>(
        &mut self,
        chain: &C,
        kind: PrayerKind,
        content: &str,
        bounty: u64,
        ttl_seconds: i64,
        max_claimers: u8,
    ) -> SdkResult<PrayerId> {
        if content.len() > MAX_PLAINTEXT_LEN {
            return Err(SdkError::ContentTooLong {
                len: content.len(),
                max: MAX_PLAINTEXT_LEN,
            });
        }

        let content_hash = ContentHasher::PRAYER_CONTENT.hash(content.as_bytes());
        let id = chain.post(
            self.id(),
            kind,
            content_hash,
            bounty,
            ttl_seconds,
            max_claimers,
        )?;
        self.cache.record_content(id, content);

        debug!(prayer = %id, %kind, bounty, "posted prayer");
        Ok(id)
    }

    /// Claim an open prayer.
    pub fn claim_on<C: ChainWriter>(&self, chain: &C, prayer: PrayerId) -> SdkResult<()> {
        chain.claim(self.id(), prayer)?;
        Ok(())
    }

    /// Seal the cached content for one claimer and deliver it.
    pub fn deliver_on<C: ChainReader + ChainWriter>(
        &self,
        chain: &C,
        prayer: PrayerId,
        claimer: &AgentId,
    ) -> SdkResult<()> {
        let content = self
            .cache
            .content(prayer)
            .ok_or(SdkError::ContentMissing(prayer))?;
        let recipient = chain
            .agent(claimer)?
            .ok_or(SdkError::AgentMissing(*claimer))?;
        let recipient_key = ExchangePublicKey::from_bytes(recipient.exchange_key);

        let blob = seal(content.as_bytes(), &recipient_key, &self.exchange)?;
        chain.deliver_content(self.id(), prayer, *claimer, blob)?;

        debug!(prayer = %prayer, claimer = %claimer, "delivered sealed content");
        Ok(())
    }

    /// Seal an answer for the requester and submit it.
    pub fn answer_on<C: ChainReader + ChainWriter>(
        &mut self,
        chain: &C,
        prayer: PrayerId,
        answer: &str,
    ) -> SdkResult<()> {
        if answer.len() > MAX_PLAINTEXT_LEN {
            return Err(SdkError::ContentTooLong {
                len: answer.len(),
                max: MAX_PLAINTEXT_LEN,
            });
        }

        let record = chain.prayer(prayer)?.ok_or(SdkError::PrayerMissing(prayer))?;
        let requester = chain
            .agent(&record.requester)?
            .ok_or(SdkError::AgentMissing(record.requester))?;
        let requester_key = ExchangePublicKey::from_bytes(requester.exchange_key);

        let encrypted = seal(answer.as_bytes(), &requester_key, &self.exchange)?;
        let answer_hash = ContentHasher::PRAYER_ANSWER.hash(answer.as_bytes());
        chain.answer(self.id(), prayer, answer_hash, encrypted)?;
        self.cache.record_answer(prayer, answer);

        debug!(prayer = %prayer, "submitted sealed answer");
        Ok(())
    }

    /// Open the content the requester sealed for this claimer.
    pub fn open_delivery<C: ChainReader>(&self, chain: &C, prayer: PrayerId) -> SdkResult<String> {
        let claim = chain
            .claim_record(prayer, &self.id())?
            .ok_or(SdkError::NoDelivery(prayer))?;
        let blob = claim.delivery.ok_or(SdkError::NoDelivery(prayer))?;

        let record = chain.prayer(prayer)?.ok_or(SdkError::PrayerMissing(prayer))?;
        let sender = chain
            .agent(&record.requester)?
            .ok_or(SdkError::AgentMissing(record.requester))?;
        let sender_key = ExchangePublicKey::from_bytes(sender.exchange_key);

        let plaintext = chorus_crypto::open(&blob, &sender_key, &self.exchange)?;
        String::from_utf8(plaintext).map_err(|_| SdkError::NotText)
    }

    /// Open the answer sealed for this requester.
    pub fn open_answer<C: ChainReader>(&self, chain: &C, prayer: PrayerId) -> SdkResult<String> {
        let record = chain.prayer(prayer)?.ok_or(SdkError::PrayerMissing(prayer))?;
        let blob = record.encrypted_answer.ok_or(SdkError::NoAnswer(prayer))?;
        let answerer = chain
            .agent(&record.answerer)?
            .ok_or(SdkError::AgentMissing(record.answerer))?;
        let answerer_key = ExchangePublicKey::from_bytes(answerer.exchange_key);

        let plaintext = chorus_crypto::open(&blob, &answerer_key, &self.exchange)?;
        String::from_utf8(plaintext).map_err(|_| SdkError::NotText)
    }

    /// Confirm a fulfilled prayer, splitting the bounty among `claimers`.
    pub fn confirm_on<C: ChainWriter>(
        &self,
        chain: &C,
        prayer: PrayerId,
        claimers: &[AgentId],
    ) -> SdkResult<PayoutSummary> {
        Ok(chain.confirm(self.id(), prayer, claimers)?)
    }

    /// Cancel an unclaimed prayer.
    pub fn cancel_on<C: ChainWriter>(&self, chain: &C, prayer: PrayerId) -> SdkResult<()> {
        chain.cancel(self.id(), prayer)?;
        Ok(())
    }

    /// Walk away from a claim (or reap someone's stale one).
    pub fn unclaim_on<C: ChainWriter>(
        &self,
        chain: &C,
        prayer: PrayerId,
        claimer: &AgentId,
    ) -> SdkResult<()> {
        chain.unclaim(self.id(), prayer, *claimer)?;
        Ok(())
    }

    /// Close a terminal prayer, reclaiming its storage deposit.
    pub fn close_on<C: ChainWriter>(&self, chain: &C, prayer: PrayerId) -> SdkResult<u64> {
        Ok(chain.close(self.id(), prayer)?)
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("id", &self.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chorus_crypto::SealError;
    use chorus_ledger::{
        ChainError, InMemoryChain, ManualTimeSource, ANSWER_REPUTATION, CONFIRM_REPUTATION,
    };
    use chorus_types::PrayerStatus;

    const T0: i64 = 1_700_000_000;
    const FUNDS: u64 = 100_000_000;

    fn chain() -> (Arc<ManualTimeSource>, InMemoryChain) {
        let clock = Arc::new(ManualTimeSource::new(T0));
        let chain = InMemoryChain::with_time_source(clock.clone());
        chain.initialize(AgentId::from_bytes([0xFF; 32])).unwrap();
        (clock, chain)
    }

    fn join(chain: &InMemoryChain, name: &str, skills: &str) -> Participant {
        let participant = Participant::new(name);
        chain.fund(&participant.id(), FUNDS).unwrap();
        participant.register_on(chain, skills).unwrap();
        participant
    }

    // -----------------------------------------------------------------------
    // Scenario A: three collaborators, 30M bounty, equal split
    // -----------------------------------------------------------------------

    #[test]
    fn collaborative_prayer_pays_three_ways() {
        let (_, chain) = chain();
        let mut x = join(&chain, "x", "requester");
        let mut y = join(&chain, "y", "oracle");
        let z = join(&chain, "z", "oracle");
        let w = join(&chain, "w", "oracle");

        let id = x
            .post_on(
                &chain,
                PrayerKind::Knowledge,
                "what moves the tide",
                30_000_000,
                86_400,
                3,
            )
            .unwrap();

        // First two claims leave the prayer open; the third flips it.
        y.claim_on(&chain, id).unwrap();
        z.claim_on(&chain, id).unwrap();
        assert_eq!(
            chain.prayer(id).unwrap().unwrap().status,
            PrayerStatus::Open
        );
        w.claim_on(&chain, id).unwrap();
        assert_eq!(
            chain.prayer(id).unwrap().unwrap().status,
            PrayerStatus::Active
        );

        // Requester seals content to each collaborator; re-delivery fails.
        for claimer in [&y.id(), &z.id(), &w.id()] {
            x.deliver_on(&chain, id, claimer).unwrap();
        }
        assert_eq!(
            x.deliver_on(&chain, id, &y.id()),
            Err(SdkError::Chain(ChainError::AlreadyDelivered))
        );

        // Each collaborator reads its own copy.
        assert_eq!(y.open_delivery(&chain, id).unwrap(), "what moves the tide");
        assert_eq!(w.open_delivery(&chain, id).unwrap(), "what moves the tide");

        y.answer_on(&chain, id, "the moon, mostly").unwrap();
        assert_eq!(
            chain.prayer(id).unwrap().unwrap().status,
            PrayerStatus::Fulfilled
        );
        assert_eq!(x.open_answer(&chain, id).unwrap(), "the moon, mostly");

        let balances_before: Vec<u64> = [&y, &z, &w]
            .iter()
            .map(|p| chain.balance(&p.id()).unwrap())
            .collect();
        let payout = x
            .confirm_on(&chain, id, &[y.id(), z.id(), w.id()])
            .unwrap();

        assert_eq!(payout.per_claimer, 10_000_000);
        for (i, p) in [&y, &z, &w].iter().enumerate() {
            assert_eq!(
                chain.balance(&p.id()).unwrap(),
                balances_before[i] + 10_000_000
            );
        }
        assert!(chain.agent(&y.id()).unwrap().unwrap().reputation >= 15);

        let info = chain.chain_info().unwrap();
        assert_eq!(info.total_prayers, 1);
        assert_eq!(info.total_answered, 1);
    }

    // -----------------------------------------------------------------------
    // Scenario B: solo prayer, zero bounty
    // -----------------------------------------------------------------------

    #[test]
    fn solo_zero_bounty_prayer_still_earns_reputation() {
        let (_, chain) = chain();
        let mut x = join(&chain, "x", "");
        let mut y = join(&chain, "y", "");
        let z = join(&chain, "z", "");

        let id = x
            .post_on(&chain, PrayerKind::Review, "audit this", 0, 3_600, 1)
            .unwrap();

        y.claim_on(&chain, id).unwrap();
        assert_eq!(
            chain.prayer(id).unwrap().unwrap().status,
            PrayerStatus::Active
        );
        assert_eq!(
            z.claim_on(&chain, id),
            Err(SdkError::Chain(ChainError::NotOpen))
        );

        y.answer_on(&chain, id, "looks sound").unwrap();

        let y_balance_before = chain.balance(&y.id()).unwrap();
        let payout = x.confirm_on(&chain, id, &[y.id()]).unwrap();

        assert_eq!(payout.per_claimer, 0);
        assert_eq!(payout.total_disbursed, 0);
        assert_eq!(chain.balance(&y.id()).unwrap(), y_balance_before);
        assert_eq!(
            chain.agent(&y.id()).unwrap().unwrap().reputation,
            ANSWER_REPUTATION + CONFIRM_REPUTATION
        );
    }

    // -----------------------------------------------------------------------
    // Encryption boundary
    // -----------------------------------------------------------------------

    #[test]
    fn bystander_cannot_open_anothers_delivery() {
        let (_, chain) = chain();
        let mut x = join(&chain, "x", "");
        let y = join(&chain, "y", "");
        let eve = join(&chain, "eve", "");

        let id = x
            .post_on(&chain, PrayerKind::Signal, "private feed endpoint", 0, 3_600, 2)
            .unwrap();
        y.claim_on(&chain, id).unwrap();
        x.deliver_on(&chain, id, &y.id()).unwrap();

        // Eve never claimed, so the SDK path finds nothing for her.
        assert_eq!(
            eve.open_delivery(&chain, id),
            Err(SdkError::NoDelivery(id))
        );

        // Even with the raw blob off the chain, her key opens nothing.
        let blob = chain
            .claim_record(id, &y.id())
            .unwrap()
            .unwrap()
            .delivery
            .unwrap();
        let sender = chain.agent(&x.id()).unwrap().unwrap();
        let sender_key = ExchangePublicKey::from_bytes(sender.exchange_key);
        let eve_secret = ExchangeSecretKey::derive(&SigningKey::generate());
        assert_eq!(
            chorus_crypto::open(&blob, &sender_key, &eve_secret),
            Err(SealError::Rejected)
        );
    }

    #[test]
    fn oversize_content_is_rejected_before_posting() {
        let (_, chain) = chain();
        let mut x = join(&chain, "x", "");
        let huge = "a".repeat(MAX_PLAINTEXT_LEN + 1);
        assert_eq!(
            x.post_on(&chain, PrayerKind::Compute, &huge, 0, 3_600, 1),
            Err(SdkError::ContentTooLong {
                len: MAX_PLAINTEXT_LEN + 1,
                max: MAX_PLAINTEXT_LEN,
            })
        );
        // Nothing reached the chain.
        assert_eq!(chain.chain_info().unwrap().total_prayers, 0);
    }

    #[test]
    fn delivery_without_cached_content_fails() {
        let (_, chain) = chain();
        let x = join(&chain, "x", "");
        // x never posted prayer 0, so it has nothing to deliver.
        assert_eq!(
            x.deliver_on(&chain, PrayerId::new(0), &x.id()),
            Err(SdkError::ContentMissing(PrayerId::new(0)))
        );
    }

    // -----------------------------------------------------------------------
    // Lifecycle via the facade
    // -----------------------------------------------------------------------

    #[test]
    fn cancel_and_close_reclaim_everything() {
        let (_, chain) = chain();
        let mut x = join(&chain, "x", "");
        let balance_start = chain.balance(&x.id()).unwrap();

        let id = x
            .post_on(&chain, PrayerKind::Knowledge, "nevermind", 7_000, 3_600, 2)
            .unwrap();
        x.cancel_on(&chain, id).unwrap();
        x.close_on(&chain, id).unwrap();

        assert_eq!(chain.balance(&x.id()).unwrap(), balance_start);
        assert!(chain.prayer(id).unwrap().is_none());
    }

    #[test]
    fn stale_claim_reaped_through_facade() {
        let (clock, chain) = chain();
        let mut x = join(&chain, "x", "");
        let y = join(&chain, "y", "");
        let reaper = join(&chain, "reaper", "");

        let id = x
            .post_on(&chain, PrayerKind::Collaboration, "join me", 0, 86_400, 1)
            .unwrap();
        y.claim_on(&chain, id).unwrap();

        clock.advance(3_601);
        reaper.unclaim_on(&chain, id, &y.id()).unwrap();
        assert_eq!(
            chain.prayer(id).unwrap().unwrap().status,
            PrayerStatus::Open
        );
    }
}
