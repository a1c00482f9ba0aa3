//! XP and Level curve
//!
//! Thresholds follow a power law of the level index:
//! `xp_required(L) = floor(base_xp * (L - 1) ^ scaling_factor)`.

use serde::{Deserialize, Serialize};

use super::error::{ProgressionError, Result};

/// Tunable parameters of the level curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurveConfig {
    #[serde(default = "default_base_xp")]
    pub base_xp: u64,
    #[serde(default = "default_scaling_factor")]
    pub scaling_factor: f64,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
}

fn default_base_xp() -> u64 {
    100
}

fn default_scaling_factor() -> f64 {
    1.5
}

fn default_max_level() -> u32 {
    50
}

impl Default for LevelCurveConfig {
    fn default() -> Self {
        Self {
            base_xp: default_base_xp(),
            scaling_factor: default_scaling_factor(),
            max_level: default_max_level(),
        }
    }
}

/// Pure mapping between cumulative XP and level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelCurve {
    config: LevelCurveConfig,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            config: LevelCurveConfig::default(),
        }
    }
}

impl LevelCurve {
    /// Build a curve, rejecting parameters that would not be strictly increasing
    pub fn new(config: LevelCurveConfig) -> Result<Self> {
        if config.base_xp == 0 {
            return Err(ProgressionError::InvalidCurve("base_xp must be positive".into()));
        }
        if !(config.scaling_factor.is_finite() && config.scaling_factor > 0.0) {
            return Err(ProgressionError::InvalidCurve(format!(
                "scaling_factor must be a positive number, got {}",
                config.scaling_factor
            )));
        }
        if config.max_level == 0 {
            return Err(ProgressionError::InvalidCurve("max_level must be at least 1".into()));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &LevelCurveConfig {
        &self.config
    }

    pub fn max_level(&self) -> u32 {
        self.config.max_level
    }

    /// Cumulative XP needed to reach `level`
    pub fn xp_required_for_level(&self, level: u32) -> u64 {
        if level <= 1 {
            return 0;
        }
        let steps = f64::from(level - 1);
        let raw = self.config.base_xp as f64 * steps.powf(self.config.scaling_factor);
        // `as` saturates, so absurd configs clamp to u64::MAX instead of wrapping
        raw.floor() as u64
    }

    /// Highest level whose threshold is reached, capped at `max_level`
    pub fn level_from_xp(&self, total_xp: u64) -> u32 {
        // Thresholds are strictly increasing, so binary search for the first
        // level past the cap or above `total_xp`
        let (mut lo, mut hi) = (1u32, self.config.max_level);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if self.xp_required_for_level(mid) <= total_xp {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }

    /// XP still missing for the next level (0 at max level)
    pub fn xp_to_next_level(&self, total_xp: u64) -> u64 {
        let level = self.level_from_xp(total_xp);
        if level >= self.config.max_level {
            return 0;
        }
        self.xp_required_for_level(level + 1).saturating_sub(total_xp)
    }

    /// Threshold of the level after `level` (the cap's threshold at max level)
    pub fn xp_for_next_level(&self, level: u32) -> u64 {
        let next = level.saturating_add(1).min(self.config.max_level);
        self.xp_required_for_level(next)
    }

    /// Progress through the current level as a 0-100 percentage
    pub fn level_progress(&self, total_xp: u64) -> u8 {
        let level = self.level_from_xp(total_xp);
        if level >= self.config.max_level {
            return 100;
        }
        let floor = self.xp_required_for_level(level);
        let ceiling = self.xp_required_for_level(level + 1);
        let span = ceiling.saturating_sub(floor);
        if span == 0 {
            return 100;
        }
        let done = total_xp.saturating_sub(floor);
        let percent = (done as f64 / span as f64 * 100.0).round();
        percent.clamp(0.0, 100.0) as u8
    }

    /// Whether `total_xp` sits at the level cap
    pub fn is_max_level(&self, total_xp: u64) -> bool {
        self.level_from_xp(total_xp) >= self.config.max_level
    }
}

/// Reward formula applied to a mini-game score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRewards {
    pub xp: u64,
    pub coins: u64,
}

impl ScoreRewards {
    /// `xp = round(base_xp * (1 + score / 100))`,
    /// `coins = round(base_coins * (1 + score / 50))`
    pub fn for_score(score: u32, base_xp: u64, base_coins: u64) -> Self {
        let score = f64::from(score);
        Self {
            xp: (base_xp as f64 * (1.0 + score / 100.0)).round() as u64,
            coins: (base_coins as f64 * (1.0 + score / 50.0)).round() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_required_for_level(0), 0);
        assert_eq!(curve.xp_required_for_level(1), 0);
        assert_eq!(curve.xp_required_for_level(2), 100);
        assert_eq!(curve.xp_required_for_level(3), 282);
        assert_eq!(curve.xp_required_for_level(5), 800);
    }

    #[test]
    fn test_thresholds_strictly_increase() {
        let curve = LevelCurve::default();
        for level in 1..curve.max_level() {
            assert!(
                curve.xp_required_for_level(level) < curve.xp_required_for_level(level + 1),
                "threshold of {} not below {}",
                level,
                level + 1
            );
        }
    }

    #[test]
    fn test_level_for_xp() {
        let curve = LevelCurve::default();
        assert_eq!(curve.level_from_xp(0), 1);
        assert_eq!(curve.level_from_xp(99), 1);
        assert_eq!(curve.level_from_xp(100), 2);
        assert_eq!(curve.level_from_xp(150), 2);
        assert_eq!(curve.level_from_xp(282), 3);
        assert_eq!(curve.level_from_xp(u64::MAX), 50); // Beyond max
    }

    #[test]
    fn test_level_round_trips_through_threshold() {
        let curve = LevelCurve::default();
        for xp in (0..400_000u64).step_by(997) {
            let level = curve.level_from_xp(xp);
            assert_eq!(curve.level_from_xp(curve.xp_required_for_level(level)), level);
        }
    }

    #[test]
    fn test_xp_to_next_level() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_to_next_level(0), 100);
        assert_eq!(curve.xp_to_next_level(150), 132);
        let cap = curve.xp_required_for_level(50);
        assert_eq!(curve.xp_to_next_level(cap), 0);
        assert_eq!(curve.xp_to_next_level(cap * 2), 0);
    }

    #[test]
    fn test_xp_for_next_level_caps() {
        let curve = LevelCurve::default();
        assert_eq!(curve.xp_for_next_level(1), 100);
        assert_eq!(curve.xp_for_next_level(50), curve.xp_required_for_level(50));
    }

    #[test]
    fn test_level_progress() {
        let curve = LevelCurve::default();
        assert_eq!(curve.level_progress(0), 0);
        assert_eq!(curve.level_progress(50), 50);
        // Level 2 spans 100..282
        assert_eq!(curve.level_progress(191), 50);
        assert_eq!(curve.level_progress(u64::MAX), 100);
        assert!(curve.is_max_level(u64::MAX));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let bad = [
            LevelCurveConfig { base_xp: 0, ..Default::default() },
            LevelCurveConfig { scaling_factor: 0.0, ..Default::default() },
            LevelCurveConfig { scaling_factor: f64::NAN, ..Default::default() },
            LevelCurveConfig { max_level: 0, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(LevelCurve::new(config), Err(ProgressionError::InvalidCurve(_))));
        }
    }

    #[test]
    fn test_single_level_curve() {
        let curve = LevelCurve::new(LevelCurveConfig { max_level: 1, ..Default::default() }).unwrap();
        assert_eq!(curve.level_from_xp(1_000_000), 1);
        assert_eq!(curve.xp_to_next_level(0), 0);
    }

    #[test]
    fn test_score_rewards() {
        let rewards = ScoreRewards::for_score(100, 40, 15);
        assert_eq!(rewards, ScoreRewards { xp: 80, coins: 45 });

        let zero = ScoreRewards::for_score(0, 50, 10);
        assert_eq!(zero, ScoreRewards { xp: 50, coins: 10 });
    }
}
