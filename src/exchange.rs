//! Purchase transactions and their conversion into a target currency.

use crate::core::{ExchangeResult, FxError, FxResult, Page, Transaction};
use crate::gateway::RateGateway;
use crate::store::TransactionStore;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

pub const MAX_DESCRIPTION_LENGTH: usize = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct ExchangeService {
    store: Arc<dyn TransactionStore>,
    gateway: RateGateway,
}

impl ExchangeService {
    pub fn new(store: Arc<dyn TransactionStore>, gateway: RateGateway) -> Self {
        Self { store, gateway }
    }

    /// Records a purchase dated now, with the amount rounded to cents.
    pub async fn create(
        &self,
        description: Option<String>,
        purchase_amount: Decimal,
    ) -> FxResult<Transaction> {
        if let Some(text) = &description
            && text.chars().count() > MAX_DESCRIPTION_LENGTH
        {
            return Err(FxError::invalid(format!(
                "Description must not exceed {MAX_DESCRIPTION_LENGTH} characters."
            )));
        }
        if purchase_amount <= Decimal::ZERO {
            return Err(FxError::invalid("Purchase amount must be a positive value."));
        }

        let transaction = Transaction {
            id: Uuid::new_v4(),
            description,
            transaction_date: Utc::now().naive_utc(),
            purchase_amount: purchase_amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        };
        info!("Recording transaction {}", transaction.id);
        self.store.save(transaction).await
    }

    pub async fn list(&self, page: i64, size: i64) -> FxResult<Page<Transaction>> {
        if page < 0 {
            return Err(FxError::invalid("Page number cannot be less than zero."));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(FxError::invalid("Page size must be between 1 and 100."));
        }
        self.store.find_all(page as usize, size as usize).await
    }

    /// Converts a stored purchase into the currency described by `currency`.
    #[instrument(skip(self))]
    pub async fn exchange(&self, id: Uuid, currency: &str) -> FxResult<ExchangeResult> {
        let transaction = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| FxError::NotFound(format!("Transaction with id '{id}' was not found.")))?;

        let exchange_details = self
            .gateway
            .quote(
                transaction.purchase_amount,
                currency,
                transaction.transaction_date.date(),
            )
            .await?;

        Ok(ExchangeResult {
            transaction,
            exchange_details,
        })
    }

    pub fn gateway(&self) -> &RateGateway {
        &self.gateway
    }

    pub async fn refresh_cache(&self) -> FxResult<usize> {
        self.gateway.manual_refresh().await
    }
}
