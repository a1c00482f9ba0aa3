//! Key-value storage for progression records
//!
//! Every persisted record (profile, histories, redeemed codes, scores) is a
//! JSON document stored under a fixed key. The medium is injectable:
//! [`SqliteStore`] persists to `~/.kellogs/universe.db`, [`MemoryStore`] keeps
//! everything in process for tests and dry runs.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage keys shared by all services
pub mod keys {
    pub const PLAYER_PROFILE: &str = "kellogsPlayerProfile";
    pub const ACTIVITY_HISTORY: &str = "kellogsActivityHistory";
    pub const TRANSACTION_HISTORY: &str = "kellogsTransactionHistory";
    pub const REDEEMED_CODES: &str = "kellogsRedeemedCodes";
    pub const DAILY_CODES: &str = "kellogs_daily_codes";
    pub const LAST_LOGIN: &str = "kellogsLastLogin";
    pub const USER_SCORES: &str = "kellogsUserScores";
    pub const HIGHSCORES_PREFIX: &str = "kellogs_highscores_";

    /// Highscore table key for a single mini-game
    pub fn highscores(game_id: &str) -> String {
        format!("{HIGHSCORES_PREFIX}{game_id}")
    }
}

/// Errors raised by the storage medium itself (not by record contents)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Host key-value storage
///
/// Implementations must make `set_many` all-or-nothing where the medium
/// allows it; the ledger relies on it to write a profile together with its
/// history entry.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Shared handle to a storage medium
pub type SharedStore = Arc<dyn KvStore>;

/// Read a JSON record, treating unparseable data as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring corrupt stored record");
            Ok(None)
        }
    }
}

/// Encode a record for storage.
pub fn encode_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Encode and write a single JSON record.
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<(), StoreError> {
    let encoded = encode_json(key, value)?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_treats_corrupt_as_absent() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();
        let value: Option<Vec<u32>> = read_json(&store, "broken").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &vec![1u32, 2, 3]).unwrap();
        let value: Option<Vec<u32>> = read_json(&store, "numbers").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_set_many_and_remove() {
        let store = MemoryStore::new();
        store.set_many(&[("a", "1".to_string()), ("b", "2".to_string())]).unwrap();
        assert_eq!(store.len(), 2);
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_highscores_key() {
        assert_eq!(keys::highscores("zucaritas"), "kellogs_highscores_zucaritas");
    }
}
