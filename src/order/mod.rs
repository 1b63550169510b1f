//! Order domain
//!
//! An order and its line items form one aggregate: created together in a
//! single transaction, read back together, and mutated afterwards only
//! through its status.

pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

#[cfg(test)]
pub mod memory;

pub use error::{OrderError, StoreError};
pub use models::{CreateOrderRequest, Order, OrderItem, OrderItemRequest, SHIPPING_FEE, order_status};
pub use postgres::PgOrderRepository;
pub use repository::{OrderRepository, StoreTransaction, TransactionManager};
pub use service::OrderService;
