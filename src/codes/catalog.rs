//! Promo code definitions
//!
//! Codes printed on cereal boxes. One-time codes can be redeemed once per
//! installation, daily codes once per local day.

use crate::progression::Reward;

/// How often a code may be redeemed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeUsage {
    OneTime,
    Daily,
}

/// A redeemable code and what it grants
#[derive(Debug, Clone)]
pub struct PromoCode {
    pub code: &'static str,
    pub active: bool,
    pub usage: CodeUsage,
    pub xp: u64,
    pub coins: u64,
    pub diamonds: u64,
    /// Name of the reward shown to the player
    pub reward_name: &'static str,
    /// Cosmetic item the code unlocks
    pub description: &'static str,
    /// Expiration time (ms since epoch)
    pub expires_at: Option<i64>,
}

impl PromoCode {
    /// Look up a code in the built-in catalog (input must be normalized)
    pub fn find(code: &str) -> Option<&'static PromoCode> {
        CODES.iter().find(|c| c.code == code)
    }

    pub fn reward(&self) -> Reward {
        let mut reward = Reward::new(self.reward_name);
        if self.xp > 0 {
            reward = reward.with_xp(self.xp);
        }
        if self.coins > 0 {
            reward = reward.with_coins(self.coins);
        }
        if self.diamonds > 0 {
            reward = reward.with_diamonds(self.diamonds);
        }
        reward
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|at| now_ms > at)
    }
}

/// Trim and uppercase user input
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

/// All built-in codes
pub static CODES: &[PromoCode] = &[
    PromoCode {
        code: "ZUCARITAS",
        active: true,
        usage: CodeUsage::OneTime,
        xp: 30,
        coins: 0,
        diamonds: 15,
        reward_name: "Zucaritas reward",
        description: "A cap with Tony the Tiger's ears",
        expires_at: None,
    },
    PromoCode {
        code: "CHOCOKRISPIS",
        active: true,
        usage: CodeUsage::OneTime,
        xp: 35,
        coins: 0,
        diamonds: 12,
        reward_name: "Choco Krispis reward",
        description: "A hat shaped like Melvin the elephant",
        expires_at: None,
    },
    PromoCode {
        code: "FROOTLOOPS",
        active: true,
        usage: CodeUsage::OneTime,
        xp: 20,
        coins: 0,
        diamonds: 20,
        reward_name: "Froot Loops reward",
        description: "A colorful necklace like Sam the toucan",
        expires_at: None,
    },
    PromoCode {
        code: "KELLOGS2023",
        active: true,
        usage: CodeUsage::OneTime,
        xp: 100,
        coins: 0,
        diamonds: 50,
        reward_name: "Special Kelloggs reward",
        description: "A limited edition cape with the Kelloggs logo",
        expires_at: None,
    },
    PromoCode {
        code: "DIARIO",
        active: true,
        usage: CodeUsage::Daily,
        xp: 5,
        coins: 10,
        diamonds: 0,
        reward_name: "Daily reward",
        description: "Reward for visiting the website",
        expires_at: None,
    },
];
