//! Purchase transactions and the results of converting them

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub purchase_amount: Decimal,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub size: usize,
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Slices `items` into the requested page. `size` must be non-zero.
    pub fn slice(items: Vec<T>, page: usize, size: usize) -> Self {
        let total_elements = items.len();
        let total_pages = total_elements.div_ceil(size);
        let content = items.into_iter().skip(page.saturating_mul(size)).take(size).collect();
        Self {
            content,
            page,
            total_pages,
            size,
            total_elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeDetails {
    pub originating_country: String,
    pub currency_label: String,
    pub exchange_rate_record_date: Option<NaiveDate>,
    pub exchange_rate: Decimal,
    pub converted_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub transaction: Transaction,
    pub exchange_details: ExchangeDetails,
}
