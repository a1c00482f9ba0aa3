//! Redeem command implementation

use anyhow::Result;

use kellogs_universe::Universe;
use kellogs_universe::codes::CodeError;

use super::{ensure_player, print_events};

pub fn redeem_command(universe: &Universe, code: &str) -> Result<()> {
    ensure_player(universe)?;

    match universe.codes().redeem(code) {
        Ok(redemption) => {
            println!("Code redeemed! {}", redemption.code.reward_name);
            println!("  Unlocked: {}", redemption.code.description);
            print_events(&redemption.outcome.events);
            Ok(())
        }
        Err(e @ (CodeError::Progression(_) | CodeError::Storage(_))) => Err(e.into()),
        // Rejections are messages for the player
        Err(e) => {
            println!("{}", e);
            Ok(())
        }
    }
}
