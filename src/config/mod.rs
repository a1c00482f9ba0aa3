//! Configuration loading and management

mod io;

use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::progression::{DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_MINIGAME_SCORE, LevelCurve, LevelCurveConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Level curve parameters
    #[serde(default)]
    pub level_curve: LevelCurveConfig,

    /// Activity and transaction history settings
    #[serde(default)]
    pub history: HistorySettings,

    /// Reward tuning
    #[serde(default)]
    pub rewards: RewardSettings,

    /// Storage location
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Entries retained per history list
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardSettings {
    /// Highest score any mini-game may report
    #[serde(default = "default_max_minigame_score")]
    pub max_minigame_score: u32,

    /// Coins granted on the first login of each day
    #[serde(default = "default_daily_login_coins")]
    pub daily_login_coins: u64,

    /// Diamonds granted on the first login of each day
    #[serde(default)]
    pub daily_login_diamonds: u64,
}

fn default_max_minigame_score() -> u32 {
    DEFAULT_MAX_MINIGAME_SCORE
}

fn default_daily_login_coins() -> u64 {
    5
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            max_minigame_score: default_max_minigame_score(),
            daily_login_coins: default_daily_login_coins(),
            daily_login_diamonds: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file (defaults to ~/.kellogs/universe.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Reject values the progression system cannot run with
    pub fn validate(&self) -> Result<()> {
        LevelCurve::new(self.level_curve)?;
        if self.history.limit == 0 {
            bail!("history.limit must be at least 1");
        }
        Ok(())
    }

    /// Database path from the config, or the default location
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("universe.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.level_curve, LevelCurveConfig::default());
        assert_eq!(config.history.limit, 100);
        assert_eq!(config.rewards.max_minigame_score, 1000);
        assert_eq!(config.rewards.daily_login_coins, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [level_curve]
            max_level = 20

            [rewards]
            daily_login_diamonds = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.level_curve.max_level, 20);
        assert_eq!(config.level_curve.base_xp, 100);
        assert_eq!(config.rewards.daily_login_diamonds, 1);
        assert_eq!(config.rewards.daily_login_coins, 5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.level_curve.scaling_factor = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.history.limit = 0;
        assert!(config.validate().is_err());
    }
}
