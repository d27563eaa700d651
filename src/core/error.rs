//! Error taxonomy for exchange-rate acquisition and conversion.

use std::fmt::Display;
use thiserror::Error;

/// Message returned when the fiscal data API could not be reached or understood.
///
/// The underlying cause is logged but never surfaced to callers.
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "The purchase cannot be converted to the target currency. \
     Reason: Failed to retrieve fiscal data from the server. The server may be unavailable or not responding.";

pub const CACHE_DISABLED_MESSAGE: &str = "Cache is currently disabled. Data cannot be refreshed. \
     Please check the system configuration or contact the system administrator for assistance.";

pub const REFRESH_FAILED_MESSAGE: &str = "Failed to fetch data from API.";

/// Why no exchange rate could be picked for a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRateReason {
    /// The lookup produced no candidate records at all.
    NoData,
    /// Candidates exist but none is dated on or before the transaction.
    OutsideWindow,
}

impl Display for NoRateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoRateReason::NoData => write!(
                f,
                "Exchange data is unavailable. Please ensure that the fiscal data source is accessible \
                 and contains valid exchange rates for the requested currency."
            ),
            NoRateReason::OutsideWindow => write!(
                f,
                "Could not get exchange data within 6 months from purchase date."
            ),
        }
    }
}

/// Status class an outer API layer should report for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    InternalServerError,
}

impl ErrorStatus {
    pub fn code(&self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::NotFound => 404,
            ErrorStatus::InternalServerError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// Malformed currency text, non-positive amount or bad paging arguments.
    #[error("{0}")]
    InvalidArgument(String),

    /// A manual refresh was requested while caching is switched off.
    #[error("{}", CACHE_DISABLED_MESSAGE)]
    CacheDisabled,

    /// Network or deserialization failure after retries were exhausted.
    #[error("{}", UPSTREAM_UNAVAILABLE_MESSAGE)]
    UpstreamUnavailable,

    /// A page fetch failed mid-sweep; the cache was left untouched.
    #[error("{}", REFRESH_FAILED_MESSAGE)]
    RefreshFailed,

    #[error("The purchase cannot be converted to the target currency. Reason: {0}")]
    NoEligibleRate(NoRateReason),

    #[error("{0}")]
    NotFound(String),

    #[error("Transaction storage failure: {0}")]
    Storage(String),
}

impl FxError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FxError::InvalidArgument(message.into())
    }

    pub fn status(&self) -> ErrorStatus {
        match self {
            FxError::InvalidArgument(_) | FxError::CacheDisabled | FxError::NoEligibleRate(_) => {
                ErrorStatus::BadRequest
            }
            FxError::NotFound(_) => ErrorStatus::NotFound,
            FxError::UpstreamUnavailable | FxError::RefreshFailed | FxError::Storage(_) => {
                ErrorStatus::InternalServerError
            }
        }
    }
}

/// Result type for exchange-rate operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(FxError::invalid("x").status(), ErrorStatus::BadRequest);
        assert_eq!(FxError::CacheDisabled.status().code(), 400);
        assert_eq!(
            FxError::NoEligibleRate(NoRateReason::NoData).status(),
            ErrorStatus::BadRequest
        );
        assert_eq!(FxError::UpstreamUnavailable.status().code(), 500);
        assert_eq!(FxError::RefreshFailed.status().code(), 500);
        assert_eq!(FxError::NotFound("gone".into()).status().code(), 404);
    }

    #[test]
    fn test_no_rate_messages_are_distinct() {
        let no_data = FxError::NoEligibleRate(NoRateReason::NoData).to_string();
        let outside = FxError::NoEligibleRate(NoRateReason::OutsideWindow).to_string();

        assert!(no_data.contains("Exchange data is unavailable"));
        assert_eq!(
            outside,
            "The purchase cannot be converted to the target currency. Reason: \
             Could not get exchange data within 6 months from purchase date."
        );
    }

    #[test]
    fn test_upstream_message_is_fixed() {
        assert_eq!(
            FxError::UpstreamUnavailable.to_string(),
            UPSTREAM_UNAVAILABLE_MESSAGE
        );
    }
}
