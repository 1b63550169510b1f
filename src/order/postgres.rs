//! PostgreSQL order store
//!
//! Orders live in `orders`, items in `order_items` keyed by the order's
//! BIGSERIAL id. Ids leave this module as decimal strings. Every statement
//! is non-persistent so the store works behind a transaction-mode pooler.

use std::any::Any;
use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};

use super::error::StoreError;
use super::models::{Order, OrderItem};
use super::repository::{OrderRepository, StoreTransaction, TransactionManager};

/// Transaction handle issued by [`PgOrderRepository::begin`]
pub struct PgTransaction(Transaction<'static, Postgres>);

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let PgTransaction(tx) = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let PgTransaction(tx) = *self;
        tx.rollback().await?;
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut (dyn Any + Send) {
        self
    }
}

/// Order store backed by a PostgreSQL pool
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert order row then item rows on one connection
    async fn insert_order(conn: &mut PgConnection, order: &mut Order) -> Result<(), StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (user_id, status, subtotal, shipping, total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, created_at, updated_at
            "#,
        )
        .persistent(false)
        .bind(&order.user_id)
        .bind(&order.status)
        .bind(order.subtotal)
        .bind(order.shipping)
        .bind(order.total)
        .fetch_one(&mut *conn)
        .await?;

        let order_id: i64 = row.try_get("id")?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, product_name, quantity, price, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .persistent(false)
            .bind(order_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.subtotal)
            .execute(&mut *conn)
            .await?;
        }

        order.id = order_id.to_string();
        order.created_at = row.try_get("created_at")?;
        order.updated_at = row.try_get("updated_at")?;
        Ok(())
    }

    async fn items_for(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, product_id, product_name, quantity, price, subtotal
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .persistent(false)
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row_to_item(row).map(|(_, item)| item))
            .collect()
    }
}

/// Store ids are BIGSERIAL rendered in canonical decimal. Signs, padding and
/// leading zeros cannot name a stored order.
fn parse_order_id(id: &str) -> Option<i64> {
    let canonical = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_digit())
        && (id == "0" || !id.starts_with('0'));
    if !canonical {
        return None;
    }
    id.parse().ok()
}

fn row_to_order(row: &PgRow) -> Result<(i64, Order), StoreError> {
    let id: i64 = row.try_get("id")?;
    let order = Order {
        id: id.to_string(),
        user_id: row.try_get("user_id")?,
        status: row.try_get("status")?,
        items: Vec::new(),
        subtotal: row.try_get("subtotal")?,
        shipping: row.try_get("shipping")?,
        total: row.try_get("total")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    };
    Ok((id, order))
}

fn row_to_item(row: &PgRow) -> Result<(i64, OrderItem), StoreError> {
    let order_id: i64 = row.try_get("order_id")?;
    let item = OrderItem {
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        quantity: row.try_get("quantity")?,
        price: row.try_get("price")?,
        subtotal: row.try_get("subtotal")?,
    };
    Ok((order_id, item))
}

#[async_trait]
impl TransactionManager for PgOrderRepository {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction(tx)))
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: &str) -> Result<Order, StoreError> {
        let order_id = parse_order_id(id).ok_or(StoreError::NotFound)?;

        let row = sqlx::query(
            r#"
            SELECT id, user_id, status, subtotal, shipping, total, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .persistent(false)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let (order_id, mut order) = row_to_order(&row)?;
        order.items = self.items_for(order_id).await?;
        Ok(order)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, status, subtotal, shipping, total, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .persistent(false)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut orders = rows
            .iter()
            .map(row_to_order)
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<i64> = orders.iter().map(|(id, _)| *id).collect();

        let item_rows = sqlx::query(
            r#"
            SELECT order_id, product_id, product_name, quantity, price, subtotal
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY id
            "#,
        )
        .persistent(false)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let (order_id, item) = row_to_item(row)?;
            items_by_order.entry(order_id).or_default().push(item);
        }

        for (id, order) in orders.iter_mut() {
            order.items = items_by_order.remove(&*id).unwrap_or_default();
        }
        Ok(orders.into_iter().map(|(_, order)| order).collect())
    }

    async fn create(&self, order: &mut Order) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::insert_order(&mut tx, order).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_in_transaction(
        &self,
        tx: &mut dyn StoreTransaction,
        order: &mut Order,
    ) -> Result<(), StoreError> {
        let tx = tx
            .as_any_mut()
            .downcast_mut::<PgTransaction>()
            .ok_or(StoreError::ForeignTransaction)?;
        Self::insert_order(&mut tx.0, order).await
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<(), StoreError> {
        let order_id = parse_order_id(id).ok_or(StoreError::NotFound)?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .persistent(false)
        .bind(status)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .persistent(false)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
