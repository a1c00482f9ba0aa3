//! History command implementation

use anyhow::Result;
use chrono::{DateTime, Local};

use kellogs_universe::Universe;

fn format_time(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn history_command(universe: &Universe, transactions: bool, limit: usize) -> Result<()> {
    if transactions {
        let mut history = universe.transaction_history()?;
        history.reverse();
        history.truncate(limit);

        if history.is_empty() {
            println!("No transactions found.");
            return Ok(());
        }
        println!("Transactions ({}):\n", history.len());
        for tx in history {
            println!(
                "  {} {:<8} {:>+6} -> {:<6} {}",
                format_time(tx.timestamp),
                tx.resource_type.as_str(),
                tx.amount,
                tx.balance,
                tx.source
            );
        }
        return Ok(());
    }

    let history = universe.recent_activity(limit)?;
    if history.is_empty() {
        println!("No activity found.");
        return Ok(());
    }
    println!("Activity ({}):\n", history.len());
    for activity in history {
        println!(
            "  {} [{}] {}",
            format_time(activity.timestamp),
            activity.activity_type.label(),
            activity.details
        );
    }
    Ok(())
}
