pub mod memory;

use crate::core::{FxResult, Page, Transaction};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryTransactionStore;

/// Persistence for purchase transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn save(&self, transaction: Transaction) -> FxResult<Transaction>;

    async fn find_by_id(&self, id: Uuid) -> FxResult<Option<Transaction>>;

    /// Zero-based page of all transactions, oldest first. `size` must be non-zero.
    async fn find_all(&self, page: usize, size: usize) -> FxResult<Page<Transaction>>;
}
