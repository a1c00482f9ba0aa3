//! Bounded append-only histories
//!
//! Both the activity log and the transaction log keep only the most recent
//! entries; once a log grows past its limit the oldest entries are evicted
//! first, so index 0 is always the oldest entry still retained.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::store::{self, KvStore, StoreError};

/// Default number of entries each history retains
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A history list stored as one JSON array under a fixed key
#[derive(Debug, Clone, Copy)]
pub struct BoundedLog {
    key: &'static str,
    limit: usize,
}

impl BoundedLog {
    pub fn new(key: &'static str, limit: usize) -> Self {
        Self { key, limit: limit.max(1) }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load all retained entries, oldest first (corrupt data reads as empty)
    pub fn load<T: DeserializeOwned>(&self, store: &dyn KvStore) -> Result<Vec<T>, StoreError> {
        Ok(store::read_json(store, self.key)?.unwrap_or_default())
    }

    /// Encode the newest `limit` entries of `entries`
    pub fn encode<T: Serialize>(&self, entries: &[T]) -> Result<String, StoreError> {
        store::encode_json(self.key, retained(entries, self.limit))
    }
}

/// The newest `limit` entries of a list, oldest first.
pub fn retained<T>(entries: &[T], limit: usize) -> &[T] {
    &entries[entries.len().saturating_sub(limit)..]
}
