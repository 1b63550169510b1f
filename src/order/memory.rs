//! In-memory order store for tests
//!
//! Mirrors the PostgreSQL store's observable behavior (string ids from a
//! sequence, newest-first listing, staged writes visible only after commit)
//! and adds failure injection plus transaction counters.

use std::any::Any;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::error::StoreError;
use super::models::Order;
use super::repository::{OrderRepository, StoreTransaction, TransactionManager};

fn injected(what: &str) -> StoreError {
    StoreError::Database(sqlx::Error::Protocol(format!("injected {} failure", what)))
}

struct Shared {
    orders: Mutex<Vec<Order>>,
    next_id: AtomicI64,
    begin_count: AtomicUsize,
    commit_count: AtomicUsize,
    rollback_count: AtomicUsize,
    fail_begin: Mutex<bool>,
    fail_commit: Mutex<bool>,
    fail_reads: Mutex<bool>,
    fail_item_at: Mutex<Option<usize>>,
}

#[derive(Clone)]
pub struct InMemoryOrderRepository {
    shared: Arc<Shared>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                orders: Mutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
                begin_count: AtomicUsize::new(0),
                commit_count: AtomicUsize::new(0),
                rollback_count: AtomicUsize::new(0),
                fail_begin: Mutex::new(false),
                fail_commit: Mutex::new(false),
                fail_reads: Mutex::new(false),
                fail_item_at: Mutex::new(None),
            }),
        }
    }

    pub fn set_fail_begin(&self, fail: bool) {
        *self.shared.fail_begin.lock().unwrap() = fail;
    }

    pub fn set_fail_commit(&self, fail: bool) {
        *self.shared.fail_commit.lock().unwrap() = fail;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        *self.shared.fail_reads.lock().unwrap() = fail;
    }

    /// Fail the insert of the item at `index` (0-based) of the next order
    pub fn set_fail_item_at(&self, index: Option<usize>) {
        *self.shared.fail_item_at.lock().unwrap() = index;
    }

    pub fn begin_count(&self) -> usize {
        self.shared.begin_count.load(Ordering::SeqCst)
    }

    pub fn commit_count(&self) -> usize {
        self.shared.commit_count.load(Ordering::SeqCst)
    }

    pub fn rollback_count(&self) -> usize {
        self.shared.rollback_count.load(Ordering::SeqCst)
    }

    pub fn order_count(&self) -> usize {
        self.shared.orders.lock().unwrap().len()
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if *self.shared.fail_reads.lock().unwrap() {
            return Err(injected("read"));
        }
        Ok(())
    }
}

pub struct InMemoryTransaction {
    shared: Arc<Shared>,
    staged: Vec<Order>,
    finished: bool,
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.rollback_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut tx = *self;
        if *tx.shared.fail_commit.lock().unwrap() {
            // dropped unfinished: counted as a rollback
            return Err(injected("commit"));
        }
        let staged = std::mem::take(&mut tx.staged);
        tx.shared.orders.lock().unwrap().extend(staged);
        tx.shared.commit_count.fetch_add(1, Ordering::SeqCst);
        tx.finished = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        drop(self);
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut (dyn Any + Send) {
        self
    }
}

#[async_trait]
impl TransactionManager for InMemoryOrderRepository {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        if *self.shared.fail_begin.lock().unwrap() {
            return Err(injected("begin"));
        }
        self.shared.begin_count.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryTransaction {
            shared: self.shared.clone(),
            staged: Vec::new(),
            finished: false,
        }))
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &str) -> Result<Order, StoreError> {
        self.check_reads()?;
        self.shared
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        self.check_reads()?;
        Ok(self
            .shared
            .orders
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, order: &mut Order) -> Result<(), StoreError> {
        let mut tx = self.begin().await?;
        self.create_in_transaction(tx.as_mut(), order).await?;
        tx.commit().await
    }

    async fn create_in_transaction(
        &self,
        tx: &mut dyn StoreTransaction,
        order: &mut Order,
    ) -> Result<(), StoreError> {
        let tx = tx
            .as_any_mut()
            .downcast_mut::<InMemoryTransaction>()
            .ok_or(StoreError::ForeignTransaction)?;

        // sequence advances even if the transaction later rolls back
        let id = self.shared.next_id.fetch_add(1, Ordering::SeqCst);

        let fail_at = *self.shared.fail_item_at.lock().unwrap();
        if matches!(fail_at, Some(index) if index < order.items.len()) {
            return Err(injected("item insert"));
        }

        let now = Utc::now();
        order.id = id.to_string();
        order.created_at = now;
        order.updated_at = now;
        tx.staged.push(order.clone());
        Ok(())
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<(), StoreError> {
        let mut orders = self.shared.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::NotFound)?;
        order.status = status.to_string();
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_reads()
    }
}
