use super::models::ResourceType;
use crate::store::StoreError;

/// Errors raised by progression operations
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("No player profile has been initialized")]
    NoProfile,

    #[error("Invalid {resource} amount: {amount}")]
    InvalidAmount { resource: ResourceType, amount: u64 },

    #[error("Not enough {resource}: requested {requested}, available {available}")]
    InsufficientFunds {
        resource: ResourceType,
        requested: u64,
        available: u64,
    },

    #[error("Invalid level curve: {0}")]
    InvalidCurve(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type Result<T, E = ProgressionError> = std::result::Result<T, E>;
