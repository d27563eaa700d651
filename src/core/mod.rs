//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;
pub mod rate;
pub mod transaction;

// Re-export main types for cleaner imports
pub use cache::RateCache;
pub use conversion::{convert, ensure_positive, lookback_start, resolve_rate};
pub use currency::normalize_currency_text;
pub use error::{ErrorStatus, FxError, FxResult, NoRateReason};
pub use rate::{PageMeta, PageResult, RateRecord, RateSource};
pub use transaction::{ExchangeDetails, ExchangeResult, Page, Transaction};
