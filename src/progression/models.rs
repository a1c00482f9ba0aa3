//! Records persisted by the progression system
//!
//! These structures are stored as JSON documents in the key-value store and
//! keep the camelCase shape the web client reads.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Username used when a profile has to be created without a login
pub const DEFAULT_USERNAME: &str = "Player";

/// The single player profile of an installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub username: String,
    pub level: u32,
    pub xp: u64,
    pub coins: u64,
    pub diamonds: u64,
    /// Creation time (ms since epoch)
    #[serde(default)]
    pub created_at: i64,
    /// Last mutation time (ms since epoch)
    pub last_updated: i64,
}

impl PlayerProfile {
    /// Fresh level-1 profile with no currencies
    pub fn new(username: impl Into<String>, now: i64) -> Self {
        Self {
            username: username.into(),
            level: 1,
            xp: 0,
            coins: 0,
            diamonds: 0,
            created_at: now,
            last_updated: now,
        }
    }

    /// Current balance of a resource
    pub fn balance(&self, resource: ResourceType) -> u64 {
        match resource {
            ResourceType::Xp => self.xp,
            ResourceType::Coins => self.coins,
            ResourceType::Diamonds => self.diamonds,
        }
    }
}

/// Why an activity was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Login,
    CodeRedemption,
    MinigameCompletion,
    AvatarCustomized,
    DailyBonus,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::CodeRedemption => "CODE_REDEMPTION",
            Self::MinigameCompletion => "MINIGAME_COMPLETION",
            Self::AvatarCustomized => "AVATAR_CUSTOMIZED",
            Self::DailyBonus => "DAILY_BONUS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::CodeRedemption => "Code redeemed",
            Self::MinigameCompletion => "Mini-game completed",
            Self::AvatarCustomized => "Avatar customized",
            Self::DailyBonus => "Daily bonus",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource moved by a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Xp,
    Coins,
    Diamonds,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xp => "XP",
            Self::Coins => "COINS",
            Self::Diamonds => "DIAMONDS",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xp => f.write_str("XP"),
            Self::Coins => f.write_str("coins"),
            Self::Diamonds => f.write_str("diamonds"),
        }
    }
}

/// A bundle of resources granted at once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coins: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diamonds: Option<u64>,
    #[serde(default)]
    pub description: String,
}

impl Reward {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_xp(mut self, xp: u64) -> Self {
        self.xp = Some(xp);
        self
    }

    pub fn with_coins(mut self, coins: u64) -> Self {
        self.coins = Some(coins);
        self
    }

    pub fn with_diamonds(mut self, diamonds: u64) -> Self {
        self.diamonds = Some(diamonds);
        self
    }

    /// True if no field would change a balance
    pub fn is_empty(&self) -> bool {
        [self.xp, self.coins, self.diamonds]
            .iter()
            .all(|v| v.unwrap_or(0) == 0)
    }
}

/// One entry of the activity history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    pub timestamp: i64,
    pub activity_type: ActivityType,
    pub details: String,
    /// Reward snapshot at grant time
    pub reward: Reward,
}

/// One entry of the transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub timestamp: i64,
    pub resource_type: ResourceType,
    /// Signed delta, negative for spends
    pub amount: i64,
    /// Balance after applying `amount`
    pub balance: u64,
    pub source: String,
}

/// Read model of the profile for progress displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub username: String,
    pub level: u32,
    pub xp: u64,
    pub coins: u64,
    pub diamonds: u64,
    /// XP still needed for the next level (0 at max level)
    pub xp_to_next_level: u64,
    /// Progress through the current level, 0-100
    pub progress_percent: u8,
    pub is_max_level: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_json_shape() {
        let profile = PlayerProfile::new("Tony", 1_700_000_000_000);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["username"], "Tony");
        assert_eq!(json["level"], 1);
        assert_eq!(json["lastUpdated"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_profile_without_created_at_still_parses() {
        let raw = r#"{"username":"Ana","xp":10,"level":1,"coins":2,"diamonds":0,"lastUpdated":5}"#;
        let profile: PlayerProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.created_at, 0);
        assert_eq!(profile.coins, 2);
    }

    #[test]
    fn test_activity_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&ActivityType::MinigameCompletion).unwrap();
        assert_eq!(json, "\"MINIGAME_COMPLETION\"");
        assert_eq!(ActivityType::CodeRedemption.as_str(), "CODE_REDEMPTION");
    }

    #[test]
    fn test_reward_is_empty() {
        assert!(Reward::new("login").is_empty());
        assert!(Reward::new("zero").with_coins(0).is_empty());
        assert!(!Reward::new("coins").with_coins(5).is_empty());
    }
}
