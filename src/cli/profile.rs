//! Login, status, spend and reset commands

use anyhow::Result;

use kellogs_universe::Universe;
use kellogs_universe::progression::{ProgressionError, ResourceType};

use super::{ensure_player, print_events};

pub fn login_command(universe: &Universe, username: &str) -> Result<()> {
    let outcome = universe.login(username)?;
    println!("Welcome, {}!", outcome.profile.username);

    if let Some(bonus) = &outcome.daily_bonus {
        println!("Daily login bonus:");
        print_events(&bonus.events);
    }
    Ok(())
}

pub fn status_command(universe: &Universe) -> Result<()> {
    let Some(progress) = universe.progress()? else {
        println!("No player yet. Run `kellogs-universe login <name>` first.");
        return Ok(());
    };

    println!("{} - level {}", progress.username, progress.level);
    if progress.is_max_level {
        println!("  XP:       {} (max level)", progress.xp);
    } else {
        println!(
            "  XP:       {} ({}% of level, {} to next)",
            progress.xp, progress.progress_percent, progress.xp_to_next_level
        );
    }
    println!("  Coins:    {}", progress.coins);
    println!("  Diamonds: {}", progress.diamonds);
    Ok(())
}

pub fn spend_command(universe: &Universe, resource: ResourceType, amount: u64, source: &str) -> Result<()> {
    ensure_player(universe)?;

    let ledger = universe.ledger();
    let result = match resource {
        ResourceType::Diamonds => ledger.spend_diamonds(amount, source),
        _ => ledger.spend_coins(amount, source),
    };

    match result {
        Ok(profile) => {
            println!("Spent {} {} on {}.", amount, resource, source);
            println!("Remaining: {} {}", profile.balance(resource), resource);
            Ok(())
        }
        // Shown to the player, not a failure of the command
        Err(ProgressionError::InsufficientFunds { available, .. }) => {
            println!("Not enough {} (you have {}).", resource, available);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn reset_command(universe: &Universe) -> Result<()> {
    let profile = universe.ledger().reset()?;
    println!("Progress reset for {}. Back to level {}.", profile.username, profile.level);
    Ok(())
}
