//! Order aggregate and request types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Flat shipping charge applied to every order (5.00)
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Known status values. The column is an open string; nothing enforces
/// transitions between these.
pub mod order_status {
    pub const PENDING: &str = "pending";
    pub const PROCESSING: &str = "processing";
    pub const SHIPPED: &str = "shipped";
    pub const COMPLETED: &str = "completed";
    pub const CANCELLED: &str = "cancelled";
}

/// Order aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Store-assigned identifier
    #[schema(example = "42")]
    pub id: String,
    pub user_id: String,
    #[schema(example = "pending")]
    pub status: String,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 25.0)]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 5.0)]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 30.0)]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item, owned by exactly one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub product_id: String,
    /// Name captured at order time
    pub product_name: String,
    pub quantity: i32,
    /// Unit price captured at order time
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.0)]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 20.0)]
    pub subtotal: Decimal,
}

/// Requested line item as supplied by the client
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    #[schema(example = "p1")]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[schema(example = 2)]
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.0)]
    pub price: Decimal,
}

impl OrderItemRequest {
    /// Product name to persist: the supplied one, or `Product <product_id>`
    pub fn display_name(&self) -> String {
        match self.product_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Product {}", self.product_id),
        }
    }
}

/// Order creation input. `user_id` is always the authenticated caller.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    pub fn new(user_id: impl Into<String>, items: Vec<OrderItemRequest>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
        }
    }
}
