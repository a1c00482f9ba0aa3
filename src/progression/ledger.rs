//! Progression ledger - the only writer of XP, coins and diamonds
//!
//! Every mutation runs inside a [`LedgerBatch`]: the ledger lock is taken, the
//! profile is loaded, changes are applied in memory, and `commit` writes the
//! profile and both history lists in one `set_many` call. Dropping a batch
//! without committing leaves storage untouched.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use super::curve::LevelCurve;
use super::error::{ProgressionError, Result};
use super::history::BoundedLog;
use super::models::{ActivityRecord, ActivityType, PlayerProfile, ResourceType, Reward, Transaction};
use super::profile::ProfileStore;
use crate::store::{SharedStore, keys};
use crate::time_bucket::now_ms;

/// A level transition caused by a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
}

/// Result of a committed batch
#[derive(Debug, Clone)]
pub struct Committed {
    pub profile: PlayerProfile,
    pub level_up: Option<LevelUp>,
}

#[derive(Clone)]
pub struct ProgressionLedger {
    store: SharedStore,
    profiles: ProfileStore,
    curve: LevelCurve,
    activities: BoundedLog,
    transactions: BoundedLog,
    /// Serializes read-modify-write sequences across clones and threads
    write_lock: Arc<Mutex<()>>,
}

impl ProgressionLedger {
    pub fn new(store: SharedStore, curve: LevelCurve, history_limit: usize) -> Self {
        Self {
            profiles: ProfileStore::new(store.clone()),
            store,
            curve,
            activities: BoundedLog::new(keys::ACTIVITY_HISTORY, history_limit),
            transactions: BoundedLog::new(keys::TRANSACTION_HISTORY, history_limit),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================
    // PROFILE LIFECYCLE
    // ========================================

    pub fn profile(&self) -> Result<Option<PlayerProfile>> {
        self.profiles.load()
    }

    pub fn initialize_player(&self, username: &str) -> Result<PlayerProfile> {
        let _guard = self.lock();
        self.profiles.initialize(username)
    }

    pub fn reset(&self) -> Result<PlayerProfile> {
        let _guard = self.lock();
        self.profiles.reset()
    }

    // ========================================
    // SINGLE-RESOURCE OPERATIONS
    // ========================================

    pub fn add_xp(&self, amount: u64, source: &str) -> Result<PlayerProfile> {
        self.single(ResourceType::Xp, amount, source, Direction::Credit)
    }

    pub fn add_coins(&self, amount: u64, source: &str) -> Result<PlayerProfile> {
        self.single(ResourceType::Coins, amount, source, Direction::Credit)
    }

    pub fn add_diamonds(&self, amount: u64, source: &str) -> Result<PlayerProfile> {
        self.single(ResourceType::Diamonds, amount, source, Direction::Credit)
    }

    pub fn spend_coins(&self, amount: u64, source: &str) -> Result<PlayerProfile> {
        self.single(ResourceType::Coins, amount, source, Direction::Debit)
    }

    pub fn spend_diamonds(&self, amount: u64, source: &str) -> Result<PlayerProfile> {
        self.single(ResourceType::Diamonds, amount, source, Direction::Debit)
    }

    fn single(&self, resource: ResourceType, amount: u64, source: &str, direction: Direction) -> Result<PlayerProfile> {
        ensure_positive(resource, amount)?;
        let mut batch = self.begin()?;
        match direction {
            Direction::Credit => batch.credit(resource, amount, source)?,
            Direction::Debit => batch.debit(resource, amount, source)?,
        }
        Ok(batch.commit()?.profile)
    }

    // ========================================
    // HISTORIES
    // ========================================

    /// Activity records, oldest first
    pub fn activity_history(&self) -> Result<Vec<ActivityRecord>> {
        Ok(self.activities.load(self.store.as_ref())?)
    }

    /// Transactions, oldest first
    pub fn transaction_history(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.load(self.store.as_ref())?)
    }

    /// Start a locked batch against the current profile
    pub fn begin(&self) -> Result<LedgerBatch<'_>> {
        let guard = self.lock();
        let profile = self.profiles.load()?.ok_or(ProgressionError::NoProfile)?;
        Ok(LedgerBatch {
            ledger: self,
            _guard: guard,
            starting_level: profile.level,
            profile,
            transactions: Vec::new(),
            activities: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Credit,
    Debit,
}

fn ensure_positive(resource: ResourceType, amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(ProgressionError::InvalidAmount { resource, amount });
    }
    Ok(())
}

/// Pending changes to the profile, holding the ledger lock until dropped
pub struct LedgerBatch<'a> {
    ledger: &'a ProgressionLedger,
    _guard: MutexGuard<'a, ()>,
    profile: PlayerProfile,
    starting_level: u32,
    transactions: Vec<Transaction>,
    activities: Vec<ActivityRecord>,
}

impl LedgerBatch<'_> {
    /// Profile as it would be committed now
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn credit(&mut self, resource: ResourceType, amount: u64, source: &str) -> Result<()> {
        ensure_positive(resource, amount)?;
        let current = self.profile.balance(resource);
        let balance = current
            .checked_add(amount)
            .ok_or(ProgressionError::InvalidAmount { resource, amount })?;
        let signed = i64::try_from(amount).map_err(|_| ProgressionError::InvalidAmount { resource, amount })?;
        self.apply(resource, balance, signed, source);
        Ok(())
    }

    pub fn debit(&mut self, resource: ResourceType, amount: u64, source: &str) -> Result<()> {
        ensure_positive(resource, amount)?;
        let available = self.profile.balance(resource);
        if amount > available {
            return Err(ProgressionError::InsufficientFunds {
                resource,
                requested: amount,
                available,
            });
        }
        let signed = i64::try_from(amount).map_err(|_| ProgressionError::InvalidAmount { resource, amount })?;
        self.apply(resource, available - amount, -signed, source);
        Ok(())
    }

    fn apply(&mut self, resource: ResourceType, balance: u64, amount: i64, source: &str) {
        match resource {
            ResourceType::Xp => self.profile.xp = balance,
            ResourceType::Coins => self.profile.coins = balance,
            ResourceType::Diamonds => self.profile.diamonds = balance,
        }
        let now = now_ms();
        self.profile.level = self.ledger.curve.level_from_xp(self.profile.xp);
        self.profile.last_updated = now;

        tracing::debug!(resource = resource.as_str(), amount, balance, source, "Ledger entry");
        self.transactions.push(Transaction {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            resource_type: resource,
            amount,
            balance,
            source: source.to_string(),
        });
    }

    /// Append an activity record to be written with this batch
    pub fn record_activity(&mut self, activity_type: ActivityType, details: &str, reward: Reward) -> ActivityRecord {
        let now = now_ms();
        let record = ActivityRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            activity_type,
            details: details.to_string(),
            reward,
        };
        self.profile.last_updated = now;
        self.activities.push(record.clone());
        record
    }

    /// Write the profile and any new history entries together
    pub fn commit(self) -> Result<Committed> {
        let ledger = self.ledger;
        let store = ledger.store.as_ref();

        let (profile_key, profile_value) = ProfileStore::encode(&self.profile)?;
        let mut entries = vec![(profile_key, profile_value)];

        if !self.transactions.is_empty() {
            let mut history: Vec<Transaction> = ledger.transactions.load(store)?;
            history.extend(self.transactions);
            entries.push((ledger.transactions.key(), ledger.transactions.encode(&history)?));
        }
        if !self.activities.is_empty() {
            let mut history: Vec<ActivityRecord> = ledger.activities.load(store)?;
            history.extend(self.activities);
            entries.push((ledger.activities.key(), ledger.activities.encode(&history)?));
        }

        store.set_many(&entries)?;

        let level_up = (self.profile.level > self.starting_level).then(|| LevelUp {
            old_level: self.starting_level,
            new_level: self.profile.level,
        });
        if let Some(up) = level_up {
            tracing::info!(old = up.old_level, new = up.new_level, "Player leveled up");
        }

        Ok(Committed {
            profile: self.profile,
            level_up,
        })
    }
}
