use crate::core::rate::RateRecord;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared, append-only set of exchange-rate records.
///
/// Cloning hands out another handle to the same set. Writes only ever add
/// records, so readers racing a merge can miss the newest records but never
/// see a partial one.
#[derive(Clone, Default)]
pub struct RateCache {
    inner: Arc<RwLock<HashSet<RateRecord>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `records` into the cache and returns how many were new.
    pub async fn merge<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = RateRecord>,
    {
        let mut cache = self.inner.write().await;
        let before = cache.len();
        cache.extend(records);
        let added = cache.len() - before;
        debug!(added, total = cache.len(), "Cache MERGE");
        added
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Records for `currency` (case-insensitive) dated strictly after `after`,
    /// most recent first.
    pub async fn find(&self, currency: &str, after: NaiveDate) -> Vec<RateRecord> {
        let cache = self.inner.read().await;
        let mut found: Vec<RateRecord> = cache
            .iter()
            .filter(|record| record.matches_currency(currency))
            .filter(|record| record.record_date.is_some_and(|date| date > after))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.record_date.cmp(&a.record_date));

        if found.is_empty() {
            debug!(currency, "Cache MISS");
        } else {
            debug!(currency, hits = found.len(), "Cache HIT");
        }
        found
    }
}
