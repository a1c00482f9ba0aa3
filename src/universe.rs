//! Universe - entry point for front ends
//!
//! Wires configuration, storage, the ledger and the collaborator services
//! together, and handles the login flow with its daily bonus.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::codes::CodesService;
use crate::config::Config;
use crate::minigames::MinigameService;
use crate::progression::{
    self, ActivityRecord, ActivityType, LevelCurve, LevelProgress, PlayerProfile, ProgressionLedger, Reward,
    RewardGrantor, RewardOutcome, Transaction,
};
use crate::store::{self, MemoryStore, SharedStore, SqliteStore, keys};
use crate::time_bucket::{day_bucket, parse_day_bucket};

/// Result of a login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub profile: PlayerProfile,
    /// Present when this was the first login of the day
    pub daily_bonus: Option<RewardOutcome>,
}

#[derive(Clone)]
pub struct Universe {
    config: Config,
    store: SharedStore,
    grantor: RewardGrantor,
    codes: CodesService,
    minigames: MinigameService,
    /// Serializes the last-login check with the bonus grant
    login_lock: Arc<Mutex<()>>,
}

impl Universe {
    /// Open the SQLite store named by the config
    pub fn open(config: Config) -> Result<Self> {
        let path = config.db_path();
        Self::open_at(config, &path)
    }

    pub fn open_at(config: Config, db_path: &Path) -> Result<Self> {
        let store = SqliteStore::open(db_path)?;
        Self::with_store(config, Arc::new(store))
    }

    /// Everything in memory, nothing persisted
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: Config, store: SharedStore) -> Result<Self> {
        config.validate()?;
        let curve = LevelCurve::new(config.level_curve)?;
        let ledger = ProgressionLedger::new(store.clone(), curve, config.history.limit);
        let grantor = RewardGrantor::new(ledger, config.rewards.max_minigame_score);
        Ok(Self {
            codes: CodesService::new(store.clone(), grantor.clone()),
            minigames: MinigameService::new(store.clone(), grantor.clone()),
            config,
            store,
            grantor,
            login_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &ProgressionLedger {
        self.grantor.ledger()
    }

    pub fn rewards(&self) -> &RewardGrantor {
        &self.grantor
    }

    pub fn codes(&self) -> &CodesService {
        &self.codes
    }

    pub fn minigames(&self) -> &MinigameService {
        &self.minigames
    }

    pub fn curve(&self) -> &LevelCurve {
        self.ledger().curve()
    }

    // ========================================
    // LOGIN
    // ========================================

    pub fn initialize_player(&self, username: &str) -> progression::Result<PlayerProfile> {
        self.ledger().initialize_player(username)
    }

    pub fn login(&self, username: &str) -> progression::Result<LoginOutcome> {
        self.login_at(username, Local::now())
    }

    /// Initialize the profile and grant the daily bonus on the day's first login
    pub fn login_at(&self, username: &str, now: DateTime<Local>) -> progression::Result<LoginOutcome> {
        let _guard = self.login_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let profile = self.initialize_player(username)?;

        let today = now.date_naive();
        let last_login: Option<String> = store::read_json(self.store.as_ref(), keys::LAST_LOGIN)?;
        let first_today = last_login
            .as_deref()
            .and_then(parse_day_bucket)
            .is_none_or(|last| last < today);
        if !first_today {
            return Ok(LoginOutcome {
                profile,
                daily_bonus: None,
            });
        }

        let settings = &self.config.rewards;
        let mut reward = Reward::new("Daily login bonus");
        if settings.daily_login_coins > 0 {
            reward = reward.with_coins(settings.daily_login_coins);
        }
        if settings.daily_login_diamonds > 0 {
            reward = reward.with_diamonds(settings.daily_login_diamonds);
        }

        let outcome = self.grantor.grant(
            reward,
            ActivityType::Login,
            &format!("Daily login - {}", day_bucket(&now)),
        )?;
        store::write_json(self.store.as_ref(), keys::LAST_LOGIN, &day_bucket(&now))?;
        tracing::info!(username, "Granted daily login bonus");

        Ok(LoginOutcome {
            profile: outcome.profile.clone(),
            daily_bonus: Some(outcome),
        })
    }

    // ========================================
    // READ ACCESSORS
    // ========================================

    pub fn player_profile(&self) -> progression::Result<Option<PlayerProfile>> {
        self.ledger().profile()
    }

    pub fn activity_history(&self) -> progression::Result<Vec<ActivityRecord>> {
        self.ledger().activity_history()
    }

    pub fn transaction_history(&self) -> progression::Result<Vec<Transaction>> {
        self.ledger().transaction_history()
    }

    /// Most recent activities, newest first
    pub fn recent_activity(&self, limit: usize) -> progression::Result<Vec<ActivityRecord>> {
        let mut history = self.activity_history()?;
        history.reverse();
        history.truncate(limit);
        Ok(history)
    }

    /// Progress through the current level, 0-100
    pub fn level_progress(&self, xp: u64) -> u8 {
        self.curve().level_progress(xp)
    }

    pub fn xp_for_next_level(&self, level: u32) -> u64 {
        self.curve().xp_for_next_level(level)
    }

    /// Progress read model, `None` before the first login
    pub fn progress(&self) -> progression::Result<Option<LevelProgress>> {
        let curve = self.curve();
        Ok(self.player_profile()?.map(|p| LevelProgress {
            xp_to_next_level: curve.xp_to_next_level(p.xp),
            progress_percent: curve.level_progress(p.xp),
            is_max_level: curve.is_max_level(p.xp),
            username: p.username,
            level: p.level,
            xp: p.xp,
            coins: p.coins,
            diamonds: p.diamonds,
        }))
    }
}
