//! Order Service
//!
//! Order management microservice: transactional order creation, per-user
//! listing, and order details enriched with shipment status.
//!
//! # Modules
//!
//! - [`config`] - YAML config with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool (pooler-safe) and migrations
//! - [`order`] - Order aggregate, store, and service
//! - [`downstream`] - Shipping and cart service clients
//! - [`aggregation`] - Order + shipment details
//! - [`auth`] - Bearer token identity
//! - [`gateway`] - HTTP API

pub mod aggregation;
pub mod auth;
pub mod config;
pub mod db;
pub mod downstream;
pub mod gateway;
pub mod logging;
pub mod order;

pub use aggregation::{OrderAggregator, OrderDetails};
pub use config::AppConfig;
pub use order::{Order, OrderError, OrderService};
