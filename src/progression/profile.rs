//! Profile store - owns the persisted player profile
//!
//! No other component reads or writes the profile key directly.

use super::error::Result;
use super::models::{DEFAULT_USERNAME, PlayerProfile};
use crate::store::{self, SharedStore, keys};
use crate::time_bucket::now_ms;

#[derive(Clone)]
pub struct ProfileStore {
    store: SharedStore,
}

impl ProfileStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Load the profile, `None` if never initialized or unreadable
    pub fn load(&self) -> Result<Option<PlayerProfile>> {
        Ok(store::read_json(self.store.as_ref(), keys::PLAYER_PROFILE)?)
    }

    /// Create the profile on first login, or rename an existing one
    pub fn initialize(&self, username: &str) -> Result<PlayerProfile> {
        if let Some(mut profile) = self.load()? {
            if profile.username != username {
                tracing::debug!(from = %profile.username, to = %username, "Renaming player");
                profile.username = username.to_string();
                profile.last_updated = now_ms();
                self.save(&profile)?;
            }
            return Ok(profile);
        }

        let profile = PlayerProfile::new(username, now_ms());
        self.save(&profile)?;
        tracing::info!(username, "Created player profile");
        Ok(profile)
    }

    /// Overwrite the persisted profile as one record
    pub fn save(&self, profile: &PlayerProfile) -> Result<()> {
        store::write_json(self.store.as_ref(), keys::PLAYER_PROFILE, profile)?;
        Ok(())
    }

    /// Encode a profile for a combined write with other records
    pub(crate) fn encode(profile: &PlayerProfile) -> Result<(&'static str, String)> {
        let encoded = store::encode_json(keys::PLAYER_PROFILE, profile)?;
        Ok((keys::PLAYER_PROFILE, encoded))
    }

    /// Recreate the initial profile, keeping the username; histories are untouched
    pub fn reset(&self) -> Result<PlayerProfile> {
        let username = self
            .load()?
            .map(|p| p.username)
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let profile = PlayerProfile::new(username, now_ms());
        self.save(&profile)?;
        tracing::info!(username = %profile.username, "Reset player profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{KvStore, MemoryStore};

    fn profile_store() -> (Arc<MemoryStore>, ProfileStore) {
        let mem = Arc::new(MemoryStore::new());
        let profiles = ProfileStore::new(mem.clone());
        (mem, profiles)
    }

    #[test]
    fn test_initialize_fresh_profile() {
        let (_, profiles) = profile_store();
        assert!(profiles.load().unwrap().is_none());

        let profile = profiles.initialize("Tony").unwrap();
        assert_eq!(profile.username, "Tony");
        assert_eq!((profile.level, profile.xp, profile.coins, profile.diamonds), (1, 0, 0, 0));
        assert_eq!(profiles.load().unwrap(), Some(profile));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_, profiles) = profile_store();
        let first = profiles.initialize("Ana").unwrap();
        let second = profiles.initialize("Ana").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_initialize_renames_existing() {
        let (_, profiles) = profile_store();
        let mut profile = profiles.initialize("Ana").unwrap();
        profile.coins = 40;
        profiles.save(&profile).unwrap();

        let renamed = profiles.initialize("Melvin").unwrap();
        assert_eq!(renamed.username, "Melvin");
        assert_eq!(renamed.coins, 40);
    }

    #[test]
    fn test_corrupt_profile_reads_as_absent() {
        let (mem, profiles) = profile_store();
        mem.set(keys::PLAYER_PROFILE, "not-json").unwrap();
        assert!(profiles.load().unwrap().is_none());

        let profile = profiles.initialize("Sam").unwrap();
        assert_eq!(profile.level, 1);
    }

    #[test]
    fn test_reset_keeps_username() {
        let (_, profiles) = profile_store();
        let mut profile = profiles.initialize("Tony").unwrap();
        profile.xp = 500;
        profile.level = 3;
        profile.diamonds = 9;
        profiles.save(&profile).unwrap();

        let reset = profiles.reset().unwrap();
        assert_eq!(reset.username, "Tony");
        assert_eq!((reset.level, reset.xp, reset.diamonds), (1, 0, 0));
    }

    #[test]
    fn test_reset_without_profile_uses_default_name() {
        let (_, profiles) = profile_store();
        assert_eq!(profiles.reset().unwrap().username, DEFAULT_USERNAME);
    }
}
