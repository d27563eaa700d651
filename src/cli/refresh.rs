use super::serve::ServeSession;
use super::ui;
use crate::exchange::ExchangeService;
use crate::gateway::RateGateway;
use crate::store::MemoryTransactionStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

/// One manual sweep of the fiscal data API into the cache.
pub async fn run_refresh(gateway: &RateGateway) -> Result<usize> {
    let pb = ui::new_spinner("Refreshing exchange rate cache...");
    let result = gateway.manual_refresh().await;
    pb.finish_and_clear();
    let size = result?;

    println!(
        "{} {}",
        ui::style_text("Cached exchange entries:", ui::StyleType::TotalLabel),
        ui::style_text(&size.to_string(), ui::StyleType::TotalValue)
    );
    Ok(size)
}

/// Keeps the scheduled refresher running and answers requests from stdin
/// against its cache until `quit` or Ctrl-C.
pub async fn run_serve(gateway: &RateGateway) -> Result<()> {
    info!("Starting scheduled cache refresh");
    let handle = gateway.start_scheduler();
    let session = ServeSession::new(ExchangeService::new(
        Arc::new(MemoryTransactionStore::new()),
        gateway.clone(),
    ));
    println!(
        "{}",
        ui::style_text(
            "Refreshing rates on schedule. Type 'help' for commands, Ctrl-C to stop.",
            ui::StyleType::Subtle
        )
    );

    let mut stdout = std::io::stdout();
    let outcome = tokio::select! {
        summary = session.run(BufReader::new(tokio::io::stdin()), &mut stdout) => {
            match summary {
                Ok(summary) if summary.quit => Ok(()),
                Ok(summary) => {
                    info!(
                        "Input closed after {} requests; refreshing until Ctrl-C",
                        summary.answered
                    );
                    wait_for_shutdown().await
                }
                Err(e) => Err(e),
            }
        }
        signal = wait_for_shutdown() => signal,
    };
    handle.abort();
    outcome?;

    info!(
        "Stopped. Cache holds {} exchange entries.",
        gateway.cache().len().await
    );
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")
}
