use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use chorus_types::limits::{MAX_CLAIMERS, MAX_NAME_LEN, MAX_SKILLS_LEN, MAX_TTL_SECONDS};
use chorus_types::{AgentId, PrayerId, PrayerKind, PrayerStatus, RecordAddress};

use crate::clock::{SystemTimeSource, TimeSource};
use crate::error::ChainError;
use crate::escrow::{equal_share, PayoutSummary};
use crate::records::{
    AgentRecord, ChainInfo, ClaimRecord, PrayerRecord, AGENT_DEPOSIT, ANSWER_REPUTATION,
    CLAIM_DEPOSIT, CONFIRM_REPUTATION, PRAYER_DEPOSIT,
};
use crate::traits::{ChainReader, ChainWriter};

/// In-memory prayer chain for tests, local demos, and embedding.
///
/// All records live behind a single `RwLock`, keyed by their deterministic
/// [`RecordAddress`]. Every transition takes the write lock once, validates
/// fully against current state, and only then mutates — so a failed
/// operation leaves no trace, and two callers racing for the last open
/// slot serialize: one wins, the other observes the filled prayer and
/// fails with a typed error.
pub struct InMemoryChain {
    time: Arc<dyn TimeSource>,
    inner: RwLock<ChainState>,
}

#[derive(Default)]
struct ChainState {
    singleton: HashMap<RecordAddress, ChainInfo>,
    agents: HashMap<RecordAddress, AgentRecord>,
    prayers: HashMap<RecordAddress, PrayerRecord>,
    claims: HashMap<RecordAddress, ClaimRecord>,
    balances: HashMap<AgentId, u64>,
}

impl ChainState {
    fn info(&self) -> Result<&ChainInfo, ChainError> {
        self.singleton
            .get(&RecordAddress::chain())
            .ok_or(ChainError::NotInitialized)
    }

    fn info_mut(&mut self) -> Result<&mut ChainInfo, ChainError> {
        self.singleton
            .get_mut(&RecordAddress::chain())
            .ok_or(ChainError::NotInitialized)
    }

    fn balance(&self, wallet: &AgentId) -> u64 {
        self.balances.get(wallet).copied().unwrap_or(0)
    }

    fn ensure_funds(&self, wallet: &AgentId, needed: u64) -> Result<(), ChainError> {
        let available = self.balance(wallet);
        if available < needed {
            return Err(ChainError::InsufficientBalance { needed, available });
        }
        Ok(())
    }

    fn debit(&mut self, wallet: &AgentId, amount: u64) -> Result<(), ChainError> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.balance(wallet);
        let remaining = available
            .checked_sub(amount)
            .ok_or(ChainError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        self.balances.insert(*wallet, remaining);
        info!(wallet = %wallet, amount, balance_after = remaining, "balance debited");
        Ok(())
    }

    fn credit(&mut self, wallet: &AgentId, amount: u64) -> Result<(), ChainError> {
        if amount == 0 {
            return Ok(());
        }
        let updated = self
            .balance(wallet)
            .checked_add(amount)
            .ok_or(ChainError::BalanceOverflow)?;
        self.balances.insert(*wallet, updated);
        info!(wallet = %wallet, amount, balance_after = updated, "balance credited");
        Ok(())
    }
}

impl InMemoryChain {
    /// Create a chain reading wall-clock time.
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    /// Create a chain with an explicit time source (tests, simulations).
    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self {
            time,
            inner: RwLock::new(ChainState::default()),
        }
    }

    /// Credit a wallet out of thin air. Test and embedding helper; the
    /// protocol itself never mints.
    pub fn fund(&self, wallet: &AgentId, amount: u64) -> Result<(), ChainError> {
        let mut state = self.inner.write().expect("lock poisoned");
        state.credit(wallet, amount)
    }
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryChain")
            .field("agents", &state.agents.len())
            .field("prayers", &state.prayers.len())
            .field("claims", &state.claims.len())
            .finish()
    }
}

impl ChainWriter for InMemoryChain {
    fn initialize(&self, authority: AgentId) -> Result<(), ChainError> {
        let now = self.time.now_unix();
        let mut state = self.inner.write().expect("lock poisoned");

        let address = RecordAddress::chain();
        if state.singleton.contains_key(&address) {
            return Err(ChainError::AlreadyInitialized);
        }

        state.singleton.insert(address, ChainInfo::new(authority, now));
        info!(authority = %authority, "chain initialized");
        Ok(())
    }

    fn register(
        &self,
        wallet: AgentId,
        name: &str,
        skills: &str,
        exchange_key: [u8; 32],
    ) -> Result<(), ChainError> {
        if name.len() > MAX_NAME_LEN {
            return Err(ChainError::NameTooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        if skills.len() > MAX_SKILLS_LEN {
            return Err(ChainError::SkillsTooLong {
                len: skills.len(),
                max: MAX_SKILLS_LEN,
            });
        }
        if exchange_key == [0u8; 32] {
            return Err(ChainError::InvalidExchangeKey);
        }

        let now = self.time.now_unix();
        let mut state = self.inner.write().expect("lock poisoned");

        state.info()?;
        let address = RecordAddress::agent(&wallet);
        if state.agents.contains_key(&address) {
            return Err(ChainError::AgentExists);
        }
        state.ensure_funds(&wallet, AGENT_DEPOSIT)?;

        state.debit(&wallet, AGENT_DEPOSIT)?;
        state.agents.insert(
            address,
            AgentRecord::new(wallet, name.to_string(), skills.to_string(), exchange_key, now),
        );
        state.info_mut()?.total_agents += 1;

        debug!(wallet = %wallet, name, "agent registered");
        Ok(())
    }

    fn post(
        &self,
        requester: AgentId,
        kind: PrayerKind,
        content_hash: [u8; 32],
        bounty: u64,
        ttl_seconds: i64,
        max_claimers: u8,
    ) -> Result<PrayerId, ChainError> {
        if max_claimers < 1 || max_claimers > MAX_CLAIMERS {
            return Err(ChainError::InvalidMaxClaimers {
                given: max_claimers,
                max: MAX_CLAIMERS,
            });
        }
        if ttl_seconds <= 0 || ttl_seconds > MAX_TTL_SECONDS {
            return Err(ChainError::InvalidTtl {
                ttl: ttl_seconds,
                max: MAX_TTL_SECONDS,
            });
        }

        let now = self.time.now_unix();
        let mut state = self.inner.write().expect("lock poisoned");

        let id = PrayerId::new(state.info()?.total_prayers);
        let agent_address = RecordAddress::agent(&requester);
        if !state.agents.contains_key(&agent_address) {
            return Err(ChainError::AgentNotFound);
        }
        let needed = bounty
            .checked_add(PRAYER_DEPOSIT)
            .ok_or(ChainError::BalanceOverflow)?;
        state.ensure_funds(&requester, needed)?;

        state.debit(&requester, needed)?;
        state.prayers.insert(
            RecordAddress::prayer(id),
            PrayerRecord {
                id,
                requester,
                kind,
                content_hash,
                bounty,
                escrow: bounty,
                deposit: PRAYER_DEPOSIT,
                status: PrayerStatus::Open,
                max_claimers,
                num_claimers: 0,
                answerer: AgentId::ZERO,
                answer_hash: [0u8; 32],
                encrypted_answer: None,
                created_at: now,
                expires_at: now.saturating_add(ttl_seconds),
                fulfilled_at: 0,
            },
        );
        state.info_mut()?.total_prayers += 1;
        state
            .agents
            .get_mut(&agent_address)
            .ok_or(ChainError::AgentNotFound)?
            .prayers_posted += 1;

        info!(prayer = %id, requester = %requester, %kind, bounty, max_claimers, "prayer posted");
        Ok(id)
    }

    fn claim(&self, claimer: AgentId, prayer: PrayerId) -> Result<(), ChainError> {
        let now = self.time.now_unix();
        let mut state = self.inner.write().expect("lock poisoned");

        let prayer_address = RecordAddress::prayer(prayer);
        let record = state
            .prayers
            .get(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;

        if !record.status.accepts_claims() {
            return Err(ChainError::NotOpen);
        }
        if record.is_expired(now) {
            return Err(ChainError::Expired);
        }
        if record.requester == claimer {
            return Err(ChainError::CannotClaimOwn);
        }
        if !state.agents.contains_key(&RecordAddress::agent(&claimer)) {
            return Err(ChainError::AgentNotFound);
        }
        let claim_address = RecordAddress::claim(prayer, &claimer);
        if state.claims.contains_key(&claim_address) {
            return Err(ChainError::AlreadyClaimed);
        }
        state.ensure_funds(&claimer, CLAIM_DEPOSIT)?;

        state.debit(&claimer, CLAIM_DEPOSIT)?;
        state
            .claims
            .insert(claim_address, ClaimRecord::new(prayer, claimer, now));
        let record = state
            .prayers
            .get_mut(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        record.num_claimers += 1;
        if record.num_claimers >= record.max_claimers {
            record.status = PrayerStatus::Active;
        }

        debug!(
            prayer = %prayer,
            claimer = %claimer,
            num_claimers = record.num_claimers,
            status = %record.status,
            "prayer claimed"
        );
        Ok(())
    }

    fn deliver_content(
        &self,
        caller: AgentId,
        prayer: PrayerId,
        claimer: AgentId,
        blob: Vec<u8>,
    ) -> Result<(), ChainError> {
        let mut state = self.inner.write().expect("lock poisoned");

        let record = state
            .prayers
            .get(&RecordAddress::prayer(prayer))
            .ok_or(ChainError::PrayerNotFound)?;
        if record.requester != caller {
            return Err(ChainError::NotRequester);
        }
        if !record.status.accepts_answers() {
            return Err(ChainError::NotClaimed);
        }

        let claim = state
            .claims
            .get_mut(&RecordAddress::claim(prayer, &claimer))
            .ok_or(ChainError::ClaimNotFound)?;
        if claim.content_delivered {
            return Err(ChainError::AlreadyDelivered);
        }

        claim.content_delivered = true;
        claim.delivery = Some(blob);

        debug!(prayer = %prayer, claimer = %claimer, "content delivered");
        Ok(())
    }

    fn answer(
        &self,
        answerer: AgentId,
        prayer: PrayerId,
        answer_hash: [u8; 32],
        encrypted_answer: Vec<u8>,
    ) -> Result<(), ChainError> {
        let now = self.time.now_unix();
        let mut state = self.inner.write().expect("lock poisoned");

        let prayer_address = RecordAddress::prayer(prayer);
        let record = state
            .prayers
            .get(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        if !record.status.accepts_answers() {
            return Err(ChainError::NotClaimed);
        }
        if record.is_expired(now) {
            return Err(ChainError::Expired);
        }
        if !state
            .claims
            .contains_key(&RecordAddress::claim(prayer, &answerer))
        {
            return Err(ChainError::NotClaimer);
        }
        let agent_address = RecordAddress::agent(&answerer);
        if !state.agents.contains_key(&agent_address) {
            return Err(ChainError::AgentNotFound);
        }

        let record = state
            .prayers
            .get_mut(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        record.status = PrayerStatus::Fulfilled;
        record.answerer = answerer;
        record.answer_hash = answer_hash;
        record.encrypted_answer = Some(encrypted_answer);
        record.fulfilled_at = now;

        let agent = state
            .agents
            .get_mut(&agent_address)
            .ok_or(ChainError::AgentNotFound)?;
        agent.prayers_answered += 1;
        agent.reputation += ANSWER_REPUTATION;
        state.info_mut()?.total_answered += 1;

        info!(prayer = %prayer, answerer = %answerer, "prayer answered");
        Ok(())
    }

    fn confirm(
        &self,
        requester: AgentId,
        prayer: PrayerId,
        claimers: &[AgentId],
    ) -> Result<PayoutSummary, ChainError> {
        let mut state = self.inner.write().expect("lock poisoned");

        let prayer_address = RecordAddress::prayer(prayer);
        let record = state
            .prayers
            .get(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        if record.requester != requester {
            return Err(ChainError::NotRequester);
        }
        if record.status != PrayerStatus::Fulfilled {
            return Err(ChainError::NotFulfilled);
        }
        let bounty = record.bounty;
        let num_claimers = record.num_claimers;
        let answerer = record.answerer;

        let answerer_address = RecordAddress::agent(&answerer);
        if !state.agents.contains_key(&answerer_address) {
            return Err(ChainError::AgentNotFound);
        }

        // Only wallets holding a live claim on this prayer can be credited;
        // duplicates in the caller's list pay at most once.
        let per_claimer = equal_share(bounty, num_claimers);
        let mut seen = HashSet::new();
        let mut recipients = Vec::new();
        for wallet in claimers {
            if !seen.insert(*wallet) {
                continue;
            }
            if state
                .claims
                .contains_key(&RecordAddress::claim(prayer, wallet))
            {
                recipients.push(*wallet);
            }
        }
        for wallet in &recipients {
            state
                .balance(wallet)
                .checked_add(per_claimer)
                .ok_or(ChainError::BalanceOverflow)?;
        }
        let total_disbursed = per_claimer * recipients.len() as u64;

        let record = state
            .prayers
            .get_mut(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        record.status = PrayerStatus::Confirmed;
        record.escrow -= total_disbursed;
        let remainder = record.escrow;

        for wallet in &recipients {
            state.credit(wallet, per_claimer)?;
        }
        let agent = state
            .agents
            .get_mut(&answerer_address)
            .ok_or(ChainError::AgentNotFound)?;
        agent.prayers_confirmed += 1;
        agent.reputation += CONFIRM_REPUTATION;

        info!(
            prayer = %prayer,
            per_claimer,
            recipients = recipients.len(),
            total_disbursed,
            remainder,
            "prayer confirmed, bounty distributed"
        );
        Ok(PayoutSummary {
            per_claimer,
            recipients,
            total_disbursed,
            remainder,
        })
    }

    fn cancel(&self, requester: AgentId, prayer: PrayerId) -> Result<(), ChainError> {
        let mut state = self.inner.write().expect("lock poisoned");

        let prayer_address = RecordAddress::prayer(prayer);
        let record = state
            .prayers
            .get(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        if record.requester != requester {
            return Err(ChainError::NotRequester);
        }
        if record.status != PrayerStatus::Open {
            return Err(ChainError::CannotCancel);
        }
        if record.num_claimers != 0 {
            return Err(ChainError::HasClaimers);
        }
        let refund = record.escrow;

        let record = state
            .prayers
            .get_mut(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        record.status = PrayerStatus::Cancelled;
        record.escrow = 0;
        state.credit(&requester, refund)?;

        info!(prayer = %prayer, refund, "prayer cancelled, escrow refunded");
        Ok(())
    }

    fn unclaim(
        &self,
        caller: AgentId,
        prayer: PrayerId,
        claimer: AgentId,
    ) -> Result<(), ChainError> {
        let now = self.time.now_unix();
        let mut state = self.inner.write().expect("lock poisoned");

        let prayer_address = RecordAddress::prayer(prayer);
        let record = state
            .prayers
            .get(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        if !record.status.accepts_answers() {
            return Err(ChainError::NotClaimed);
        }

        let claim_address = RecordAddress::claim(prayer, &claimer);
        let claim = state
            .claims
            .get(&claim_address)
            .ok_or(ChainError::ClaimNotFound)?;
        let voluntary = caller == claim.claimer;
        if !voluntary && !claim.is_stale(now) {
            return Err(ChainError::NotClaimer);
        }
        let deposit = claim.deposit;

        state.claims.remove(&claim_address);
        state.credit(&claimer, deposit)?;
        let record = state
            .prayers
            .get_mut(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        record.num_claimers -= 1;
        // A freed slot reopens the prayer.
        if record.status == PrayerStatus::Active {
            record.status = PrayerStatus::Open;
        }

        debug!(
            prayer = %prayer,
            claimer = %claimer,
            voluntary,
            num_claimers = record.num_claimers,
            "claim removed"
        );
        Ok(())
    }

    fn close(&self, requester: AgentId, prayer: PrayerId) -> Result<u64, ChainError> {
        let mut state = self.inner.write().expect("lock poisoned");

        let prayer_address = RecordAddress::prayer(prayer);
        let record = state
            .prayers
            .get(&prayer_address)
            .ok_or(ChainError::PrayerNotFound)?;
        if record.requester != requester {
            return Err(ChainError::NotRequester);
        }
        if !record.status.is_terminal() {
            return Err(ChainError::CannotClose);
        }
        let refund = record.deposit + record.escrow;

        // A claim must never outlive its prayer: sweep any remaining claims
        // and return their deposits to the claimers.
        let swept: Vec<RecordAddress> = state
            .claims
            .iter()
            .filter(|(_, claim)| claim.prayer_id == prayer)
            .map(|(address, _)| *address)
            .collect();
        for address in swept {
            if let Some(claim) = state.claims.remove(&address) {
                state.credit(&claim.claimer, claim.deposit)?;
            }
        }

        state.prayers.remove(&prayer_address);
        state.credit(&requester, refund)?;

        info!(prayer = %prayer, refund, "prayer closed, storage reclaimed");
        Ok(refund)
    }
}

impl ChainReader for InMemoryChain {
    fn chain_info(&self) -> Result<ChainInfo, ChainError> {
        let state = self.inner.read().expect("lock poisoned");
        state.info().cloned()
    }

    fn agent(&self, wallet: &AgentId) -> Result<Option<AgentRecord>, ChainError> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.agents.get(&RecordAddress::agent(wallet)).cloned())
    }

    fn prayer(&self, id: PrayerId) -> Result<Option<PrayerRecord>, ChainError> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.prayers.get(&RecordAddress::prayer(id)).cloned())
    }

    fn claim_record(
        &self,
        id: PrayerId,
        claimer: &AgentId,
    ) -> Result<Option<ClaimRecord>, ChainError> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.claims.get(&RecordAddress::claim(id, claimer)).cloned())
    }

    fn balance(&self, wallet: &AgentId) -> Result<u64, ChainError> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.balance(wallet))
    }
}
