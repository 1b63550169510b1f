//! Storage seams for the order aggregate
//!
//! The service sees storage only through these traits so the PostgreSQL
//! store and the in-memory test store are interchangeable.

use std::any::Any;

use async_trait::async_trait;

use super::error::StoreError;
use super::models::Order;

/// Open unit of work
///
/// Dropping a transaction without committing rolls it back, so every early
/// return out of a write path discards its partial work.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;

    /// Lets a store recover its own concrete transaction type
    fn as_any_mut(&mut self) -> &mut (dyn Any + Send);
}

/// Starts transactions
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;
}

/// Persistence operations on orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Order with all of its items. Unknown id yields `StoreError::NotFound`.
    async fn find_by_id(&self, id: &str) -> Result<Order, StoreError>;

    /// All orders of a user, newest first, each with its items
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError>;

    /// Persist order and items in a transaction of the store's own
    async fn create(&self, order: &mut Order) -> Result<(), StoreError>;

    /// Persist order and items inside a caller-owned transaction.
    /// On success the generated id and timestamps are written back to `order`.
    async fn create_in_transaction(
        &self,
        tx: &mut dyn StoreTransaction,
        order: &mut Order,
    ) -> Result<(), StoreError>;

    /// Overwrite status and bump `updated_at`
    async fn update_status(&self, id: &str, status: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
