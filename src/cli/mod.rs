//! CLI command implementations

pub mod history;
pub mod init;
pub mod play;
pub mod profile;
pub mod redeem;

use std::path::Path;

use anyhow::{Context, Result};

use kellogs_universe::Universe;
use kellogs_universe::config::Config;
use kellogs_universe::progression::{DEFAULT_USERNAME, PlayerProfile, ProgressEvent};

/// Load the config and open the progression store
pub fn open_universe(config_path: Option<&Path>, db_path: Option<&Path>) -> Result<Universe> {
    let config = Config::load(config_path)?;
    let db_path = db_path.map(Path::to_path_buf).unwrap_or_else(|| config.db_path());
    Universe::open_at(config, &db_path)
        .with_context(|| format!("Failed to open progression store: {}", db_path.display()))
}

/// Current profile, creating a default one if nobody has logged in yet
pub fn ensure_player(universe: &Universe) -> Result<PlayerProfile> {
    if let Some(profile) = universe.player_profile()? {
        return Ok(profile);
    }
    tracing::debug!("No profile yet, creating {}", DEFAULT_USERNAME);
    Ok(universe.initialize_player(DEFAULT_USERNAME)?)
}

pub fn print_events(events: &[ProgressEvent]) {
    for event in events {
        match event {
            ProgressEvent::XpAwarded { amount } => println!("  +{} XP", amount),
            ProgressEvent::CoinsAwarded { amount } => println!("  +{} coins", amount),
            ProgressEvent::DiamondsAwarded { amount } => println!("  +{} diamonds", amount),
            ProgressEvent::LevelUp(up) => {
                println!("  Level up! {} -> {}", up.old_level, up.new_level)
            }
        }
    }
}
