//! Player progression: level curve, profile, ledger and rewards
//!
//! ```text
//!   RewardGrantor ──► ProgressionLedger ──► ProfileStore ──► KvStore
//!                            │                                  ▲
//!                            ├──► LevelCurve                    │
//!                            └──► activity / transaction logs ──┘
//! ```
//!
//! The ledger is the only writer of XP and currencies. It recomputes the
//! level from XP on every mutation, so `profile.level` always equals
//! `LevelCurve::level_from_xp(profile.xp)`.

mod curve;
mod error;
mod history;
mod ledger;
mod models;
mod profile;
mod rewards;

pub use curve::{LevelCurve, LevelCurveConfig, ScoreRewards};
pub use error::{ProgressionError, Result};
pub use history::DEFAULT_HISTORY_LIMIT;
pub use ledger::{Committed, LedgerBatch, LevelUp, ProgressionLedger};
pub use models::{
    ActivityRecord, ActivityType, DEFAULT_USERNAME, LevelProgress, PlayerProfile, ResourceType, Reward,
    Transaction,
};
pub use profile::ProfileStore;
pub use rewards::{
    DEFAULT_MAX_MINIGAME_SCORE, DEFAULT_MINIGAME_BASE_COINS, DEFAULT_MINIGAME_BASE_XP, ProgressEvent,
    RewardGrantor, RewardOutcome,
};
