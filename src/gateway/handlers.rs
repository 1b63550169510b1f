//! Gateway HTTP handlers

pub mod health;
pub mod internal;
pub mod order;

pub use health::{HealthResponse, health_check};
pub use internal::{UpdateStatusRequest, update_order_status};
pub use order::{CreateOrderBody, create_order, get_order, get_order_details, list_orders};
