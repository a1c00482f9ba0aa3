//! Promo code redemption
//!
//! Validates codes against the catalog, tracks which ones were consumed, and
//! grants their reward through the [`RewardGrantor`].

mod catalog;

pub use catalog::{CODES, CodeUsage, PromoCode, normalize_code};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};

use crate::progression::{ActivityType, ProgressionError, RewardGrantor, RewardOutcome};
use crate::store::{self, SharedStore, StoreError, keys};
use crate::time_bucket::day_bucket;

/// Why a code could not be redeemed
#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    #[error("Invalid or expired code '{0}'. Please check it and try again.")]
    Unknown(String),

    #[error("Code '{0}' has been deactivated.")]
    Inactive(String),

    #[error("Code '{0}' has expired.")]
    Expired(String),

    #[error("Code '{0}' has already been redeemed.")]
    AlreadyRedeemed(String),

    #[error("Code '{0}' was already used today. Come back tomorrow.")]
    UsedToday(String),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// A successful redemption
#[derive(Debug, Clone)]
pub struct Redemption {
    pub code: PromoCode,
    pub outcome: RewardOutcome,
}

#[derive(Clone)]
pub struct CodesService {
    store: SharedStore,
    grantor: RewardGrantor,
    catalog: Vec<PromoCode>,
    /// Serializes validate-then-mark so a code cannot be consumed twice
    redeem_lock: Arc<Mutex<()>>,
}

impl CodesService {
    /// Service over the built-in catalog
    pub fn new(store: SharedStore, grantor: RewardGrantor) -> Self {
        Self::with_catalog(store, grantor, CODES.to_vec())
    }

    pub fn with_catalog(store: SharedStore, grantor: RewardGrantor, catalog: Vec<PromoCode>) -> Self {
        Self {
            store,
            grantor,
            catalog,
            redeem_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn validate(&self, input: &str) -> Result<&PromoCode, CodeError> {
        self.validate_at(input, Local::now())
    }

    /// Check whether `input` could be redeemed at `now`
    pub fn validate_at(&self, input: &str, now: DateTime<Local>) -> Result<&PromoCode, CodeError> {
        let normalized = normalize_code(input);
        let code = self
            .catalog
            .iter()
            .find(|c| c.code == normalized)
            .ok_or_else(|| CodeError::Unknown(normalized.clone()))?;

        if !code.active {
            return Err(CodeError::Inactive(normalized));
        }
        if code.is_expired(now.timestamp_millis()) {
            return Err(CodeError::Expired(normalized));
        }

        match code.usage {
            CodeUsage::OneTime => {
                if self.redeemed_codes()?.contains(&normalized) {
                    return Err(CodeError::AlreadyRedeemed(normalized));
                }
            }
            CodeUsage::Daily => {
                if self.daily_usage()?.get(&normalized) == Some(&day_bucket(&now)) {
                    return Err(CodeError::UsedToday(normalized));
                }
            }
        }
        Ok(code)
    }

    pub fn redeem(&self, input: &str) -> Result<Redemption, CodeError> {
        self.redeem_at(input, Local::now())
    }

    /// Validate, consume and reward a code
    pub fn redeem_at(&self, input: &str, now: DateTime<Local>) -> Result<Redemption, CodeError> {
        let _guard = self.redeem_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let code = self.validate_at(input, now)?.clone();

        // Never consume a code that cannot be rewarded
        if self.grantor.ledger().profile()?.is_none() {
            return Err(ProgressionError::NoProfile.into());
        }

        match code.usage {
            CodeUsage::OneTime => {
                let mut redeemed = self.redeemed_codes()?;
                redeemed.insert(code.code.to_string());
                store::write_json(self.store.as_ref(), keys::REDEEMED_CODES, &redeemed)?;
            }
            CodeUsage::Daily => {
                let mut usage = self.daily_usage()?;
                usage.insert(code.code.to_string(), day_bucket(&now));
                store::write_json(self.store.as_ref(), keys::DAILY_CODES, &usage)?;
            }
        }

        let outcome = if code.coins == 0 {
            self.grantor.reward_code_redemption(code.code, code.diamonds, code.xp)?
        } else {
            self.grantor.grant(
                code.reward(),
                ActivityType::CodeRedemption,
                &format!("Code {} redeemed", code.code),
            )?
        };
        tracing::info!(code = code.code, "Redeemed promo code");
        Ok(Redemption { code, outcome })
    }

    /// One-time codes already consumed
    pub fn redeemed_codes(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(store::read_json(self.store.as_ref(), keys::REDEEMED_CODES)?.unwrap_or_default())
    }

    /// Daily codes mapped to the day they were last used
    fn daily_usage(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(store::read_json(self.store.as_ref(), keys::DAILY_CODES)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::progression::{DEFAULT_MAX_MINIGAME_SCORE, LevelCurve, ProgressionLedger};
    use crate::store::MemoryStore;

    fn service() -> CodesService {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let ledger = ProgressionLedger::new(store.clone(), LevelCurve::default(), 100);
        ledger.initialize_player("Tony").unwrap();
        CodesService::new(store, RewardGrantor::new(ledger, DEFAULT_MAX_MINIGAME_SCORE))
    }

    fn noon(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_redeem_one_time_code() {
        let codes = service();
        let redemption = codes.redeem_at(" zucaritas ", noon(1)).unwrap();
        assert_eq!(redemption.code.code, "ZUCARITAS");
        assert_eq!(redemption.outcome.profile.diamonds, 15);
        assert_eq!(redemption.outcome.profile.xp, 30);
        assert!(codes.redeemed_codes().unwrap().contains("ZUCARITAS"));

        let again = codes.redeem_at("ZUCARITAS", noon(2)).unwrap_err();
        assert!(matches!(again, CodeError::AlreadyRedeemed(_)));
    }

    #[test]
    fn test_reward_description_by_code_kind() {
        let codes = service();
        let diamonds = codes.redeem_at("KELLOGS2023", noon(1)).unwrap();
        assert_eq!(diamonds.outcome.activity.reward.description, "Redeemed code KELLOGS2023");
        assert_eq!(diamonds.outcome.activity.reward.coins, None);

        let daily = codes.redeem_at("DIARIO", noon(1)).unwrap();
        assert_eq!(daily.outcome.activity.reward.description, "Daily reward");
        assert_eq!(daily.outcome.activity.reward.coins, Some(10));
        assert_eq!(daily.outcome.activity.activity_type, ActivityType::CodeRedemption);
    }

    #[test]
    fn test_daily_code_once_per_day() {
        let codes = service();
        codes.redeem_at("diario", noon(1)).unwrap();
        let err = codes.redeem_at("DIARIO", noon(1) + Duration::hours(3)).unwrap_err();
        assert!(matches!(err, CodeError::UsedToday(_)));

        let next_day = codes.redeem_at("DIARIO", noon(2)).unwrap();
        assert_eq!(next_day.outcome.profile.coins, 20);
    }

    #[test]
    fn test_unknown_code() {
        let codes = service();
        assert!(matches!(codes.validate("NOPE"), Err(CodeError::Unknown(_))));
    }

    #[test]
    fn test_inactive_and_expired_codes() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let ledger = ProgressionLedger::new(store.clone(), LevelCurve::default(), 100);
        let grantor = RewardGrantor::new(ledger, DEFAULT_MAX_MINIGAME_SCORE);
        let base = PromoCode::find("FROOTLOOPS").unwrap().clone();
        let catalog = vec![
            PromoCode { code: "OFF", active: false, ..base.clone() },
            PromoCode { code: "OLD", expires_at: Some(noon(1).timestamp_millis()), ..base },
        ];
        let codes = CodesService::with_catalog(store, grantor, catalog);

        assert!(matches!(codes.validate_at("off", noon(1)), Err(CodeError::Inactive(_))));
        assert!(codes.validate_at("old", noon(1)).is_ok());
        assert!(matches!(codes.validate_at("old", noon(2)), Err(CodeError::Expired(_))));
    }

    #[test]
    fn test_code_not_consumed_without_profile() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let ledger = ProgressionLedger::new(store.clone(), LevelCurve::default(), 100);
        let codes = CodesService::new(store, RewardGrantor::new(ledger, DEFAULT_MAX_MINIGAME_SCORE));

        let err = codes.redeem_at("ZUCARITAS", noon(1)).unwrap_err();
        assert!(matches!(err, CodeError::Progression(ProgressionError::NoProfile)));
        assert!(codes.redeemed_codes().unwrap().is_empty());
    }
}
