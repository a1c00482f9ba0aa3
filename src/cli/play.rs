//! Mini-game commands

use anyhow::Result;

use kellogs_universe::Universe;

use super::{ensure_player, print_events};

pub fn play_command(universe: &Universe, game: &str, score: u32) -> Result<()> {
    ensure_player(universe)?;
    let submission = universe.minigames().submit_score(game, score)?;

    println!("{} finished with {} points.", game, submission.score);
    if submission.is_highscore {
        println!("New highscore entry!");
    }
    print_events(&submission.outcome.events);
    Ok(())
}

pub fn games_command(universe: &Universe) {
    println!("Mini-games:\n");
    for game in universe.minigames().games() {
        println!("  {} [{}] - {}", game.id, game.difficulty, game.name);
        println!("    {}", game.description);
        print!("    Base reward: {} XP, {} coins, max score {}", game.base_xp, game.base_coins, game.max_score);
        if let Some(limit) = game.time_limit_secs {
            print!(", {}s limit", limit);
        }
        println!();
    }
}

pub fn highscores_command(universe: &Universe, game: &str, limit: usize) -> Result<()> {
    let table = universe.minigames().highscores(game, limit)?;
    if table.is_empty() {
        println!("No scores for {} yet.", game);
        return Ok(());
    }

    println!("Highscores for {}:\n", game);
    for (rank, entry) in table.iter().enumerate() {
        println!("  {:>2}. {:<16} {}", rank + 1, entry.username, entry.score);
    }
    Ok(())
}
