use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use kellogs_universe::progression::ResourceType;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "kellogs-universe")]
#[command(about = "Kellogs Universe - levels, rewards and promo codes")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.kellogs/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the progression database (overrides the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Currency {
    Coins,
    Diamonds,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, creating the profile if needed and granting the daily bonus
    Login {
        username: String,
    },

    /// Show level, XP and balances
    Status,

    /// Report a finished mini-game run
    Play {
        /// Mini-game id (see `games`)
        game: String,
        score: u32,
    },

    /// List available mini-games
    Games,

    /// Show the highscore table of a mini-game
    Highscores {
        game: String,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Redeem a promo code
    Redeem {
        code: String,
    },

    /// Spend coins or diamonds
    Spend {
        #[arg(value_enum)]
        currency: Currency,
        amount: u64,

        /// What the currency was spent on
        #[arg(long, default_value = "shop")]
        source: String,
    },

    /// Show recent activity or transactions
    History {
        /// Show transactions instead of activities
        #[arg(long)]
        transactions: bool,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Reset level, XP and balances (histories are kept)
    Reset,

    /// Write a default configuration file
    InitConfig {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let open = || cli::open_universe(cli.config.as_deref(), cli.db.as_deref());

    match cli.command {
        Commands::InitConfig { force } => cli::init::init_command(cli.config.as_deref(), force)?,
        Commands::Login { username } => cli::profile::login_command(&open()?, &username)?,
        Commands::Status => cli::profile::status_command(&open()?)?,
        Commands::Play { game, score } => cli::play::play_command(&open()?, &game, score)?,
        Commands::Games => cli::play::games_command(&open()?),
        Commands::Highscores { game, limit } => cli::play::highscores_command(&open()?, &game, limit)?,
        Commands::Redeem { code } => cli::redeem::redeem_command(&open()?, &code)?,
        Commands::Spend {
            currency,
            amount,
            source,
        } => {
            let resource = match currency {
                Currency::Coins => ResourceType::Coins,
                Currency::Diamonds => ResourceType::Diamonds,
            };
            cli::profile::spend_command(&open()?, resource, amount, &source)?
        }
        Commands::History { transactions, limit } => {
            cli::history::history_command(&open()?, transactions, limit)?
        }
        Commands::Reset => cli::profile::reset_command(&open()?)?,
    }

    Ok(())
}
