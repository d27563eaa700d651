//! Candidate rate lookup: cache first, filtered API call as fallback.

use crate::core::{
    FxResult, RateCache, RateRecord, RateSource, lookback_start, normalize_currency_text,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct RateSelector {
    source: Arc<dyn RateSource>,
    cache: RateCache,
    cache_enabled: bool,
}

impl RateSelector {
    pub fn new(source: Arc<dyn RateSource>, cache: RateCache, cache_enabled: bool) -> Self {
        Self {
            source,
            cache,
            cache_enabled,
        }
    }

    /// Candidate records for `currency` within the lookback window of
    /// `transaction_date`.
    ///
    /// Served from the cache when it is enabled, populated and has matches;
    /// otherwise the API is queried with a server-side filter. An empty
    /// upstream reply yields an empty list.
    #[instrument(name = "RateLookup", skip(self))]
    pub async fn lookup(
        &self,
        currency: &str,
        transaction_date: NaiveDate,
    ) -> FxResult<Vec<RateRecord>> {
        let currency = normalize_currency_text(currency)?;

        if self.cache_enabled && !self.cache.is_empty().await {
            let cached = self
                .cache
                .find(&currency, lookback_start(transaction_date))
                .await;
            if !cached.is_empty() {
                return Ok(cached);
            }
        }

        debug!("Falling back to filtered fiscal data request");
        let page = self.source.fetch_filtered(&currency, transaction_date).await?;
        Ok(page.map(|p| p.data).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FxError, PageResult};
    use crate::refresher::tests::ScriptedSource;
    use rust_decimal_macros::dec;
    use std::sync::atomic::Ordering;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn brazil(day: NaiveDate) -> RateRecord {
        RateRecord::new("Brazil", "Real", day, dec!(5.033))
    }

    fn source_with_filtered(records: Vec<RateRecord>) -> Arc<ScriptedSource> {
        let source = ScriptedSource::default();
        *source.filtered.lock().unwrap() = Some(PageResult {
            data: records,
            ..Default::default()
        });
        Arc::new(source)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let source = source_with_filtered(vec![]);
        let cache = RateCache::new();
        cache.merge(vec![brazil(date(2024, 3, 31))]).await;
        let selector = RateSelector::new(source.clone(), cache, true);

        let found = selector.lookup("brazil-real", date(2024, 5, 1)).await.unwrap();
        assert_eq!(found, vec![brazil(date(2024, 3, 31))]);
        assert_eq!(source.filtered_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookback_window_boundaries() {
        let transaction = date(2024, 5, 15);
        let window_start = date(2023, 11, 15);
        let too_old = window_start.pred_opt().unwrap();
        let just_inside = window_start.succ_opt().unwrap();

        let source = source_with_filtered(vec![]);
        let cache = RateCache::new();
        cache.merge(vec![brazil(too_old), brazil(just_inside)]).await;
        let selector = RateSelector::new(source.clone(), cache, true);

        let found = selector.lookup("Brazil-Real", transaction).await.unwrap();
        assert_eq!(found, vec![brazil(just_inside)]);
    }

    #[tokio::test]
    async fn test_cache_miss_falls_back_to_api() {
        let remote = vec![RateRecord::new("Canada", "Dollar", date(2024, 3, 31), dec!(1.354))];
        let source = source_with_filtered(remote.clone());
        let cache = RateCache::new();
        cache.merge(vec![brazil(date(2024, 3, 31))]).await;
        let selector = RateSelector::new(source.clone(), cache, true);

        let found = selector.lookup("Canada-Dollar", date(2024, 5, 1)).await.unwrap();
        assert_eq!(found, remote);
        assert_eq!(source.filtered_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_ignored() {
        let source = source_with_filtered(vec![]);
        let cache = RateCache::new();
        cache.merge(vec![brazil(date(2024, 3, 31))]).await;
        let selector = RateSelector::new(source.clone(), cache, false);

        let found = selector.lookup("Brazil-Real", date(2024, 5, 1)).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(source.filtered_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_upstream_reply_is_empty_list() {
        let source = Arc::new(ScriptedSource::default());
        let selector = RateSelector::new(source.clone(), RateCache::new(), true);

        let found = selector.lookup("Brazil-Real", date(2024, 5, 1)).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(source.filtered_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_currency_is_rejected_before_lookup() {
        let source = Arc::new(ScriptedSource::default());
        let selector = RateSelector::new(source.clone(), RateCache::new(), true);

        let err = selector.lookup("Brazil", date(2024, 5, 1)).await.unwrap_err();
        assert!(matches!(err, FxError::InvalidArgument(_)));
        assert_eq!(source.filtered_calls.load(Ordering::SeqCst), 0);
    }
}
