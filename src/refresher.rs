//! Full pagination sweeps of the fiscal data API into the shared cache.

use crate::core::{FxError, FxResult, RateCache, RateSource};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

pub struct CacheRefresher {
    source: Arc<dyn RateSource>,
    cache: RateCache,
    cache_enabled: bool,
    interval: Duration,
    disabled_notice_sent: AtomicBool,
}

impl CacheRefresher {
    pub fn new(
        source: Arc<dyn RateSource>,
        cache: RateCache,
        cache_enabled: bool,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            cache_enabled,
            interval,
            disabled_notice_sent: AtomicBool::new(false),
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn disabled_notice_sent(&self) -> bool {
        self.disabled_notice_sent.load(Ordering::SeqCst)
    }

    /// Timer entry point. With caching disabled this logs a notice on the
    /// first call only and does nothing else.
    pub async fn scheduled_refresh(&self) -> FxResult<()> {
        if !self.cache_enabled {
            if !self.disabled_notice_sent.swap(true, Ordering::SeqCst) {
                info!(
                    "Cache is disabled. All exchange rates will be retrieved via API calls, which may slow \
                     down performance. High request frequency could lead to errors, as the Treasury Fiscal \
                     API has limited capacity for handling frequent requests."
                );
            }
            return Ok(());
        }

        self.refresh().await.map(|_| ())
    }

    /// Explicit refresh; fails when caching is disabled. Returns the cache size.
    pub async fn manual_refresh(&self) -> FxResult<usize> {
        if !self.cache_enabled {
            return Err(FxError::CacheDisabled);
        }

        self.refresh().await
    }

    #[instrument(name = "CacheRefresh", skip(self))]
    async fn refresh(&self) -> FxResult<usize> {
        info!("Refreshing cache...");
        let mut working = HashSet::new();
        let mut page: u32 = 1;

        loop {
            let result = match self.source.fetch_page(page).await {
                Ok(Some(result)) => result,
                Ok(None) => {
                    error!(page, "Failed to fetch data from API: empty response");
                    return Err(FxError::RefreshFailed);
                }
                Err(e) => {
                    error!(page, error = %e, "Failed to fetch data from API");
                    return Err(FxError::RefreshFailed);
                }
            };

            working.extend(result.data);
            let total = result.meta.total_count;
            let remaining = total as i128 - working.len() as i128;
            debug!(page, total, accumulated = working.len(), "Fetched page");

            if remaining <= 0 {
                break;
            }
            if u64::from(page) >= result.meta.total_pages.max(1) {
                warn!(
                    page,
                    total,
                    accumulated = working.len(),
                    "Reached the last reported page before the reported total; stopping"
                );
                break;
            }
            page += 1;
        }

        let added = self.cache.merge(working).await;
        let size = self.cache.len().await;
        info!(
            "Cache refreshed successfully. Holding {} exchange entries ({} new).",
            size, added
        );
        Ok(size)
    }

    /// Runs `scheduled_refresh` now and then again `interval` after each
    /// completion, until the returned task is aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if let Err(e) = self.scheduled_refresh().await {
                    error!(error = %e, "Scheduled cache refresh failed");
                }
                tokio::time::sleep(self.interval).await;
            }
        })
    }
}
