//! Reward grantor - composes multi-resource rewards
//!
//! A grant applies XP, then coins, then diamonds, and appends exactly one
//! activity record, all inside one ledger batch.

use super::curve::ScoreRewards;
use super::error::Result;
use super::ledger::{LevelUp, ProgressionLedger};
use super::models::{ActivityRecord, ActivityType, PlayerProfile, ResourceType, Reward};

/// Base rewards for a mini-game that does not define its own
pub const DEFAULT_MINIGAME_BASE_XP: u64 = 50;
pub const DEFAULT_MINIGAME_BASE_COINS: u64 = 10;

/// Default highest score a mini-game may report
pub const DEFAULT_MAX_MINIGAME_SCORE: u32 = 1000;

/// Events that happened while granting a reward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    XpAwarded { amount: u64 },
    CoinsAwarded { amount: u64 },
    DiamondsAwarded { amount: u64 },
    LevelUp(LevelUp),
}

/// Everything a grant produced
#[derive(Debug, Clone)]
pub struct RewardOutcome {
    pub profile: PlayerProfile,
    pub activity: ActivityRecord,
    pub events: Vec<ProgressEvent>,
}

impl RewardOutcome {
    pub fn level_up(&self) -> Option<LevelUp> {
        self.events.iter().find_map(|e| match e {
            ProgressEvent::LevelUp(up) => Some(*up),
            _ => None,
        })
    }
}

#[derive(Clone)]
pub struct RewardGrantor {
    ledger: ProgressionLedger,
    max_minigame_score: u32,
}

impl RewardGrantor {
    pub fn new(ledger: ProgressionLedger, max_minigame_score: u32) -> Self {
        Self {
            ledger,
            max_minigame_score,
        }
    }

    pub fn ledger(&self) -> &ProgressionLedger {
        &self.ledger
    }

    /// Grant `reward` and record the activity, returning the updated profile
    pub fn grant_reward(&self, reward: Reward, activity_type: ActivityType, details: &str) -> Result<PlayerProfile> {
        Ok(self.grant(reward, activity_type, details)?.profile)
    }

    /// Grant `reward`, reporting awarded resources and level-ups
    pub fn grant(&self, reward: Reward, activity_type: ActivityType, details: &str) -> Result<RewardOutcome> {
        let source = activity_type.as_str();
        if reward.is_empty() {
            tracing::debug!(activity = %activity_type, details, "Recording activity without resources");
        }
        let mut events = Vec::new();
        let mut batch = self.ledger.begin()?;

        let parts = [
            (ResourceType::Xp, reward.xp),
            (ResourceType::Coins, reward.coins),
            (ResourceType::Diamonds, reward.diamonds),
        ];
        for (resource, amount) in parts {
            let Some(amount) = amount.filter(|a| *a > 0) else {
                continue;
            };
            batch.credit(resource, amount, source)?;
            events.push(match resource {
                ResourceType::Xp => ProgressEvent::XpAwarded { amount },
                ResourceType::Coins => ProgressEvent::CoinsAwarded { amount },
                ResourceType::Diamonds => ProgressEvent::DiamondsAwarded { amount },
            });
        }

        let activity = batch.record_activity(activity_type, details, reward);
        let committed = batch.commit()?;
        if let Some(up) = committed.level_up {
            events.push(ProgressEvent::LevelUp(up));
        }

        tracing::debug!(activity = %activity_type, details, events = events.len(), "Granted reward");
        Ok(RewardOutcome {
            profile: committed.profile,
            activity,
            events,
        })
    }

    /// Reward a finished mini-game; `score` is clamped to the configured maximum
    pub fn reward_minigame_completion(
        &self,
        game_id: &str,
        score: u32,
        base_xp: u64,
        base_coins: u64,
    ) -> Result<RewardOutcome> {
        let score = self.clamp_score(score);
        let earned = ScoreRewards::for_score(score, base_xp, base_coins);
        let reward = Reward::new(format!("Completed mini-game {game_id} with {score} points"))
            .with_xp(earned.xp)
            .with_coins(earned.coins);

        self.grant(
            reward,
            ActivityType::MinigameCompletion,
            &format!("Mini-game {game_id} completed with {score} points"),
        )
    }

    /// Grant a promo code paying diamonds and XP (codes with coins use [`grant`](Self::grant))
    pub fn reward_code_redemption(&self, code: &str, diamonds: u64, xp: u64) -> Result<RewardOutcome> {
        let reward = Reward::new(format!("Redeemed code {code}"))
            .with_diamonds(diamonds)
            .with_xp(xp);
        self.grant(reward, ActivityType::CodeRedemption, &format!("Code {code} redeemed"))
    }

    pub fn clamp_score(&self, score: u32) -> u32 {
        if score > self.max_minigame_score {
            tracing::warn!(score, max = self.max_minigame_score, "Clamping reported score");
        }
        score.min(self.max_minigame_score)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::progression::curve::LevelCurve;
    use crate::progression::error::ProgressionError;
    use crate::store::MemoryStore;

    fn grantor() -> RewardGrantor {
        let ledger = ProgressionLedger::new(Arc::new(MemoryStore::new()), LevelCurve::default(), 100);
        ledger.initialize_player("Tony").unwrap();
        RewardGrantor::new(ledger, DEFAULT_MAX_MINIGAME_SCORE)
    }

    #[test]
    fn test_minigame_completion_rewards() {
        let grantor = grantor();
        let outcome = grantor.reward_minigame_completion("zucaritas", 100, 40, 15).unwrap();

        assert_eq!(outcome.profile.xp, 80);
        assert_eq!(outcome.profile.coins, 45);

        let activities = grantor.ledger().activity_history().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity_type, ActivityType::MinigameCompletion);
        assert_eq!(activities[0].reward.xp, Some(80));
        assert_eq!(activities[0].reward.coins, Some(45));
    }

    #[test]
    fn test_default_base_rewards_at_zero_score() {
        let grantor = grantor();
        let outcome = grantor
            .reward_minigame_completion("unlisted", 0, DEFAULT_MINIGAME_BASE_XP, DEFAULT_MINIGAME_BASE_COINS)
            .unwrap();
        assert_eq!(outcome.profile.xp, 50);
        assert_eq!(outcome.profile.coins, 10);
    }

    #[test]
    fn test_grant_order_and_sources() {
        let grantor = grantor();
        let reward = Reward::new("bundle").with_diamonds(3).with_coins(2).with_xp(1);
        grantor.grant_reward(reward, ActivityType::DailyBonus, "bundle").unwrap();

        let txs = grantor.ledger().transaction_history().unwrap();
        let order: Vec<_> = txs.iter().map(|t| t.resource_type).collect();
        assert_eq!(order, vec![ResourceType::Xp, ResourceType::Coins, ResourceType::Diamonds]);
        assert!(txs.iter().all(|t| t.source == "DAILY_BONUS"));
    }

    #[test]
    fn test_empty_reward_still_records_activity() {
        let grantor = grantor();
        let outcome = grantor
            .grant(Reward::new("hello"), ActivityType::Login, "login without bonus")
            .unwrap();

        assert!(outcome.events.is_empty());
        assert!(outcome.activity.reward.is_empty());
        assert_eq!(outcome.profile.coins, 0);
        assert!(grantor.ledger().transaction_history().unwrap().is_empty());
        assert_eq!(grantor.ledger().activity_history().unwrap().len(), 1);
    }

    #[test]
    fn test_level_up_event() {
        let grantor = grantor();
        let outcome = grantor
            .grant(Reward::new("big").with_xp(300), ActivityType::CodeRedemption, "big")
            .unwrap();
        assert_eq!(outcome.level_up(), Some(LevelUp { old_level: 1, new_level: 3 }));
    }

    #[test]
    fn test_score_is_clamped() {
        let grantor = grantor();
        let outcome = grantor.reward_minigame_completion("froot-loops", 1_000_000, 50, 12).unwrap();
        let expected = ScoreRewards::for_score(DEFAULT_MAX_MINIGAME_SCORE, 50, 12);
        assert_eq!(outcome.profile.xp, expected.xp);
        assert_eq!(outcome.profile.coins, expected.coins);
    }

    #[test]
    fn test_grant_without_profile() {
        let ledger = ProgressionLedger::new(Arc::new(MemoryStore::new()), LevelCurve::default(), 100);
        let grantor = RewardGrantor::new(ledger, DEFAULT_MAX_MINIGAME_SCORE);
        let err = grantor.reward_code_redemption("ZUCARITAS", 15, 30).unwrap_err();
        assert!(matches!(err, ProgressionError::NoProfile));
    }

    #[test]
    fn test_no_deduplication() {
        let grantor = grantor();
        grantor.reward_code_redemption("ZUCARITAS", 15, 30).unwrap();
        let profile = grantor.ledger().profile().unwrap().unwrap();
        let again = grantor.reward_code_redemption("ZUCARITAS", 15, 30).unwrap();
        assert_eq!(again.profile.diamonds, profile.diamonds + 15);
    }
}
