use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use treasury_fx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for treasury_fx::AppCommand {
    fn from(cmd: Commands) -> treasury_fx::AppCommand {
        match cmd {
            Commands::Refresh => treasury_fx::AppCommand::Refresh,
            Commands::Rates { currency, date } => {
                treasury_fx::AppCommand::Rates { currency, date }
            }
            Commands::Convert {
                amount,
                currency,
                date,
            } => treasury_fx::AppCommand::Convert {
                amount,
                currency,
                date,
            },
            Commands::Serve => treasury_fx::AppCommand::Serve,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch every exchange rate into the cache once
    Refresh,
    /// List candidate exchange rates for a currency
    Rates {
        /// Country and currency, e.g. "Brazil-Real"
        #[arg(long)]
        currency: String,
        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Convert a USD amount at the rate in effect on a date
    Convert {
        /// Amount in USD
        #[arg(long)]
        amount: Decimal,
        /// Country and currency, e.g. "Brazil-Real"
        #[arg(long)]
        currency: String,
        /// Purchase date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Keep the cache refreshed on a schedule until interrupted
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, matches!(cli.command, Some(Commands::Serve)));

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => treasury_fx::cli::setup::setup_at_path(path),
            None => treasury_fx::cli::setup::setup(),
        },
        Some(cmd) => treasury_fx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
