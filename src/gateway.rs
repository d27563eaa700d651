//! Wires the fiscal data client, the shared cache, the refresher and the
//! selector together from configuration.

use crate::core::config::FiscalDataConfig;
use crate::core::{
    ExchangeDetails, FxResult, RateCache, RateRecord, RateSource, convert, ensure_positive,
    resolve_rate,
};
use crate::providers::FiscalDataClient;
use crate::refresher::CacheRefresher;
use crate::selector::RateSelector;
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct RateGateway {
    cache: RateCache,
    refresher: Arc<CacheRefresher>,
    selector: RateSelector,
}

impl RateGateway {
    pub fn from_config(config: &FiscalDataConfig) -> Result<Self> {
        let client = FiscalDataClient::new(config)?;
        Ok(Self::with_source(Arc::new(client), config))
    }

    /// Builds a gateway around any rate source, with a fresh empty cache.
    pub fn with_source(source: Arc<dyn RateSource>, config: &FiscalDataConfig) -> Self {
        let cache = RateCache::new();
        let refresher = Arc::new(CacheRefresher::new(
            Arc::clone(&source),
            cache.clone(),
            config.enable_caching,
            config.refresh_interval(),
        ));
        let selector = RateSelector::new(source, cache.clone(), config.enable_caching);

        Self {
            cache,
            refresher,
            selector,
        }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    pub fn refresher(&self) -> &Arc<CacheRefresher> {
        &self.refresher
    }

    pub async fn manual_refresh(&self) -> FxResult<usize> {
        self.refresher.manual_refresh().await
    }

    /// Starts the periodic refresh task.
    pub fn start_scheduler(&self) -> JoinHandle<()> {
        Arc::clone(&self.refresher).spawn()
    }

    pub async fn lookup(
        &self,
        currency: &str,
        transaction_date: NaiveDate,
    ) -> FxResult<Vec<RateRecord>> {
        self.selector.lookup(currency, transaction_date).await
    }

    /// Converts `amount` at the latest rate on or before `transaction_date`.
    ///
    /// The amount is checked before any lookup happens.
    pub async fn quote(
        &self,
        amount: Decimal,
        currency: &str,
        transaction_date: NaiveDate,
    ) -> FxResult<ExchangeDetails> {
        ensure_positive(amount)?;

        let candidates = self.lookup(currency, transaction_date).await?;
        let rate = resolve_rate(&candidates, transaction_date)?;
        let converted_amount = convert(amount, rate.exchange_rate)?;

        Ok(ExchangeDetails {
            originating_country: rate.originating_country,
            currency_label: rate.currency_label,
            exchange_rate_record_date: rate.record_date,
            exchange_rate: rate.exchange_rate,
            converted_amount,
        })
    }
}
