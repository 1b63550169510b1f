//! Order business logic
//!
//! Pricing, validation and the create transaction. Reads pass through to the
//! store with not-found translated to [`OrderError::OrderNotFound`].

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use super::error::OrderError;
use super::models::{CreateOrderRequest, Order, OrderItem, SHIPPING_FEE, order_status};
use super::repository::{OrderRepository, TransactionManager};

/// Largest scale the `NUMERIC(12,2)` money columns hold
const MONEY_SCALE: u32 = 2;

/// Column widths of `orders` and `order_items`
const MAX_USER_ID_LEN: usize = 64;
const MAX_STATUS_LEN: usize = 32;
const MAX_PRODUCT_ID_LEN: usize = 64;
const MAX_PRODUCT_NAME_LEN: usize = 255;

/// Exclusive upper bound of a `NUMERIC(12,2)` value
fn money_limit() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    transactions: Arc<dyn TransactionManager>,
}

impl OrderService {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        transactions: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            repository,
            transactions,
        }
    }

    /// Orders of `user_id`, newest first. Store failures propagate unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>, OrderError> {
        Ok(self.repository.find_by_user(user_id).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> Result<Order, OrderError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(OrderError::from_lookup)
    }

    /// Price and persist a new order atomically.
    ///
    /// Validation happens before any transaction is opened. Any failure after
    /// `begin` drops the transaction, which rolls it back.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id, items = request.items.len()))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        let mut order = price_order(request)?;

        let mut tx = self.transactions.begin().await?;
        self.repository
            .create_in_transaction(tx.as_mut(), &mut order)
            .await?;
        tx.commit().await?;

        tracing::info!(order_id = %order.id, total = %order.total, "Order created");
        Ok(order)
    }

    /// Overwrite an order's status. No transition rules are applied.
    #[tracing::instrument(skip(self))]
    pub async fn update_order_status(&self, id: &str, status: &str) -> Result<(), OrderError> {
        if status.trim().is_empty() {
            return Err(OrderError::invalid("status must not be empty"));
        }
        if status.chars().count() > MAX_STATUS_LEN {
            return Err(OrderError::invalid(format!(
                "status longer than {} characters",
                MAX_STATUS_LEN
            )));
        }
        self.repository
            .update_status(id, status)
            .await
            .map_err(OrderError::from_lookup)?;

        tracing::info!(order_id = %id, status = %status, "Order status updated");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), OrderError> {
        Ok(self.repository.health_check().await?)
    }
}

/// Build the pending order for a request: line subtotals, order subtotal,
/// flat shipping and total. Nothing is persisted.
pub fn price_order(request: CreateOrderRequest) -> Result<Order, OrderError> {
    if request.items.is_empty() {
        return Err(OrderError::invalid("order must contain at least one item"));
    }
    if request.user_id.chars().count() > MAX_USER_ID_LEN {
        return Err(OrderError::invalid(format!(
            "user_id longer than {} characters",
            MAX_USER_ID_LEN
        )));
    }

    let mut items = Vec::with_capacity(request.items.len());
    let mut subtotal = Decimal::ZERO;

    for item in &request.items {
        if item.product_id.trim().is_empty() {
            return Err(OrderError::invalid("product_id must not be empty"));
        }
        if item.product_id.chars().count() > MAX_PRODUCT_ID_LEN {
            return Err(OrderError::invalid(format!(
                "product_id longer than {} characters",
                MAX_PRODUCT_ID_LEN
            )));
        }
        let product_name = item.display_name();
        if product_name.chars().count() > MAX_PRODUCT_NAME_LEN {
            return Err(OrderError::invalid(format!(
                "product_name longer than {} characters for product {}",
                MAX_PRODUCT_NAME_LEN, item.product_id
            )));
        }
        if item.quantity <= 0 {
            return Err(OrderError::invalid(format!(
                "quantity must be positive for product {}",
                item.product_id
            )));
        }
        let price = item.price.normalize();
        if price.is_sign_negative() {
            return Err(OrderError::invalid(format!(
                "price must not be negative for product {}",
                item.product_id
            )));
        }
        if price.scale() > MONEY_SCALE {
            return Err(OrderError::invalid(format!(
                "price has more than {} decimal places for product {}",
                MONEY_SCALE, item.product_id
            )));
        }

        let line_total = price
            .checked_mul(Decimal::from(item.quantity))
            .ok_or_else(|| OrderError::invalid("line amount out of range"))?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or_else(|| OrderError::invalid("order amount out of range"))?;

        items.push(OrderItem {
            product_id: item.product_id.clone(),
            product_name,
            quantity: item.quantity,
            price,
            subtotal: line_total,
        });
    }

    let total = subtotal
        .checked_add(SHIPPING_FEE)
        .filter(|total| *total < money_limit())
        .ok_or_else(|| OrderError::invalid("order amount out of range"))?;

    let now = Utc::now();
    Ok(Order {
        id: String::new(),
        user_id: request.user_id,
        status: order_status::PENDING.to_string(),
        items,
        subtotal,
        shipping: SHIPPING_FEE,
        total,
        created_at: now,
        updated_at: now,
    })
}
