use crate::core::config::FiscalDataConfig;
use crate::core::{
    FxError, FxResult, PageResult, RateSource, lookback_start, normalize_currency_text,
};
use crate::providers::util::{Delay, Failure, RetryPolicy, TokioDelay, with_retry};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub const RATES_OF_EXCHANGE_PATH: &str = "/v1/accounting/od/rates_of_exchange";
const FIELDS: &str = "record_date,exchange_rate,country,currency,country_currency_desc";
const PAGE_SIZE: u32 = 10_000;

/// Client for the Treasury "rates of exchange" data set.
pub struct FiscalDataClient {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    delay: Arc<dyn Delay>,
}

impl FiscalDataClient {
    pub fn new(config: &FiscalDataConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("treasury-fx/1.0")
            .timeout(config.request_timeout())
            .build()?;

        Ok(FiscalDataClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::new(
                config.max_connection_attempts,
                config.delay_between_attempts(),
            ),
            delay: Arc::new(TokioDelay),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// URI for one page of the full, unfiltered sweep.
    pub fn complete_data_uri(&self, page: u32) -> String {
        format!(
            "{}{}?fields={}&page[number]={}&page[size]={}",
            self.base_url, RATES_OF_EXCHANGE_PATH, FIELDS, page, PAGE_SIZE
        )
    }

    /// URI for the records of one currency since the start of the lookback window.
    pub fn filtered_uri(&self, currency: &str, transaction_date: NaiveDate) -> FxResult<String> {
        let currency = normalize_currency_text(currency)?;
        let since = lookback_start(transaction_date).format("%Y-%m-%d");

        Ok(format!(
            "{}{}?fields={}&filter=country_currency_desc:in:({}),record_date:gte:{}&sort=-record_date",
            self.base_url, RATES_OF_EXCHANGE_PATH, FIELDS, currency, since
        ))
    }

    async fn fetch_body(&self, uri: &str) -> Result<String, Failure<anyhow::Error>> {
        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| Failure::Transient(anyhow!("Request error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::Transient(anyhow!("HTTP error: {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| Failure::Transient(anyhow!("Failed to read response body: {e}")))
    }

    /// Fetches and decodes one reply. A body that is not a valid page is
    /// a permanent failure; retrying the same request would not change it.
    async fn fetch_page_result(
        &self,
        uri: &str,
    ) -> Result<Option<PageResult>, Failure<anyhow::Error>> {
        let body = self.fetch_body(uri).await?;

        if body.trim().is_empty() {
            debug!("Received empty response");
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| Failure::Permanent(anyhow!("Failed to parse fiscal data response: {e}")))
    }

    #[instrument(name = "FiscalDataFetch", skip(self))]
    async fn communicate(&self, uri: &str) -> FxResult<Option<PageResult>> {
        debug!("Requesting exchange data from {}", uri);

        let page = with_retry(
            || self.fetch_page_result(uri),
            &self.retry,
            self.delay.as_ref(),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to retrieve fiscal data");
            FxError::UpstreamUnavailable
        })?;

        if let Some(page) = &page {
            debug!(
                records = page.data.len(),
                total = page.meta.total_count,
                "Received fiscal data page"
            );
        }
        Ok(page)
    }
}

#[async_trait]
impl RateSource for FiscalDataClient {
    async fn fetch_page(&self, page: u32) -> FxResult<Option<PageResult>> {
        self.communicate(&self.complete_data_uri(page)).await
    }

    async fn fetch_filtered(
        &self,
        currency: &str,
        transaction_date: NaiveDate,
    ) -> FxResult<Option<PageResult>> {
        let uri = self.filtered_uri(currency, transaction_date)?;
        self.communicate(&uri).await
    }
}
