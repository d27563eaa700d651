use crate::core::{FxResult, Page, Transaction};
use crate::store::TransactionStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// In-memory transaction store using HashMap and Mutex
#[derive(Clone, Default)]
pub struct MemoryTransactionStore {
    inner: Arc<Mutex<HashMap<Uuid, Transaction>>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn save(&self, transaction: Transaction) -> FxResult<Transaction> {
        let mut store = self.inner.lock().await;
        debug!("Store PUT for id: {}", transaction.id);
        store.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn find_by_id(&self, id: Uuid) -> FxResult<Option<Transaction>> {
        let store = self.inner.lock().await;
        let found = store.get(&id).cloned();
        if found.is_some() {
            debug!("Store HIT for id: {}", id);
        } else {
            debug!("Store MISS for id: {}", id);
        }
        Ok(found)
    }

    async fn find_all(&self, page: usize, size: usize) -> FxResult<Page<Transaction>> {
        let store = self.inner.lock().await;
        let mut all: Vec<Transaction> = store.values().cloned().collect();
        all.sort_by(|a, b| {
            a.transaction_date
                .cmp(&b.transaction_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(Page::slice(all, page, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn transaction(day: u32) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            description: Some(format!("purchase {day}")),
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            purchase_amount: dec!(10.00),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = MemoryTransactionStore::new();
        let saved = store.save(transaction(1)).await.unwrap();

        assert_eq!(store.find_by_id(saved.id).await.unwrap(), Some(saved));
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_pages_oldest_first() {
        let store = MemoryTransactionStore::new();
        for day in [3, 1, 2] {
            store.save(transaction(day)).await.unwrap();
        }

        let first = store.find_all(0, 2).await.unwrap();
        assert_eq!(first.total_elements, 3);
        assert_eq!(first.total_pages, 2);
        assert_eq!(
            first
                .content
                .iter()
                .map(|t| t.description.clone().unwrap())
                .collect::<Vec<_>>(),
            vec!["purchase 1", "purchase 2"]
        );

        let second = store.find_all(1, 2).await.unwrap();
        assert_eq!(second.content.len(), 1);
    }
}
