pub mod cli;
pub mod core;
pub mod exchange;
pub mod gateway;
pub mod providers;
pub mod refresher;
pub mod selector;
pub mod store;

use crate::core::config::AppConfig;
use crate::gateway::RateGateway;
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

pub enum AppCommand {
    Refresh,
    Rates {
        currency: String,
        date: NaiveDate,
    },
    Convert {
        amount: Decimal,
        currency: String,
        date: NaiveDate,
    },
    Serve,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("treasury-fx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let gateway = RateGateway::from_config(&config.fiscal_data)?;

    match command {
        AppCommand::Refresh => cli::refresh::run_refresh(&gateway).await.map(|_| ()),
        AppCommand::Rates { currency, date } => {
            cli::rates::run_rates(&gateway, &currency, date).await
        }
        AppCommand::Convert {
            amount,
            currency,
            date,
        } => cli::rates::run_convert(&gateway, amount, &currency, date).await,
        AppCommand::Serve => cli::refresh::run_serve(&gateway).await,
    }
}
