//! Exchange rate records and the upstream source abstraction

use crate::core::error::FxResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One exchange-rate observation for a country/currency on a date.
///
/// Equality and hashing cover all five fields, so a set of records
/// silently drops exact duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(rename = "country")]
    pub originating_country: String,
    #[serde(rename = "currency")]
    pub currency_label: String,
    #[serde(rename = "country_currency_desc")]
    pub country_currency_description: String,
    #[serde(default)]
    pub record_date: Option<NaiveDate>,
    pub exchange_rate: Decimal,
}

impl RateRecord {
    pub fn new(
        originating_country: &str,
        currency_label: &str,
        record_date: NaiveDate,
        exchange_rate: Decimal,
    ) -> Self {
        Self {
            originating_country: originating_country.to_string(),
            currency_label: currency_label.to_string(),
            country_currency_description: format!("{originating_country}-{currency_label}"),
            record_date: Some(record_date),
            exchange_rate,
        }
    }

    pub fn matches_currency(&self, currency: &str) -> bool {
        self.country_currency_description.to_lowercase() == currency.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(rename = "count", default)]
    pub page_count: u64,
    #[serde(rename = "total-count", default)]
    pub total_count: u64,
    #[serde(rename = "total-pages", default)]
    pub total_pages: u64,
}

/// A single page returned by the rates of exchange endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(default)]
    pub data: Vec<RateRecord>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Source of exchange-rate pages.
///
/// `Ok(None)` means the upstream answered successfully but with an empty body.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches one page of the full, unfiltered data set (pages start at 1).
    async fn fetch_page(&self, page: u32) -> FxResult<Option<PageResult>>;

    /// Fetches the records for `currency` dated within the lookback window
    /// of `transaction_date`, most recent first.
    async fn fetch_filtered(
        &self,
        currency: &str,
        transaction_date: NaiveDate,
    ) -> FxResult<Option<PageResult>>;
}
