//! Kellogs Universe - player progression and economy
//!
//! Keeps the single player profile of an installation (level, XP, coins,
//! diamonds) together with its activity and transaction histories, and grants
//! rewards for the things players do in the promo site.
//!
//! ## Collaborators
//!
//! Mini-games, the promo code screen and the login screen never touch the
//! profile directly. They report results through:
//!
//! 1. **[`MinigameService`](minigames::MinigameService)**: final scores,
//!    clamped and turned into XP and coins.
//! 2. **[`CodesService`](codes::CodesService)**: validated promo codes.
//! 3. **[`Universe::login`]**: profile creation and the daily login bonus.

pub mod codes;
pub mod config;
pub mod minigames;
pub mod progression;
pub mod store;
pub mod time_bucket;
mod universe;

pub use universe::{LoginOutcome, Universe};
