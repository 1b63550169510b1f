//! Order Service entry point
//!
//! ```text
//! config ─▶ logging ─▶ PostgreSQL pool ─▶ OrderService ─┬─▶ OrderAggregator ─▶ gateway
//!                       shipping / cart clients ─────────┘
//! ```
//!
//! Usage: `order_service [--env <name>] [--port <port>]`

use std::sync::Arc;
use std::time::Duration;

use order_service::aggregation::OrderAggregator;
use order_service::auth::IdentityVerifier;
use order_service::config::AppConfig;
use order_service::db::Database;
use order_service::downstream::{CartClient, ShippingClient};
use order_service::gateway::{self, state::AppState};
use order_service::order::{OrderService, PgOrderRepository};

fn arg_value(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1).cloned())
}

fn get_env() -> String {
    arg_value(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    arg_value(&["--port"]).and_then(|p| p.parse().ok())
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let mut app_config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: invalid configuration ({}): {}", env, e);
            std::process::exit(1);
        }
    };
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }

    let _log_guard = order_service::logging::init_logging(&app_config);
    tracing::info!(env = %env, git = env!("GIT_HASH"), "Starting order service");

    if let Err(e) = run(app_config).await {
        tracing::error!(error = %format!("{:#}", e), "Order service failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = Database::connect(&config.database).await?;
    if config.database.run_migrations {
        db.run_migrations().await?;
    }

    let store = Arc::new(PgOrderRepository::new(db.pool().clone()));
    let orders = Arc::new(OrderService::new(store.clone(), store));

    let shipping = Arc::new(ShippingClient::new(
        &config.downstream.shipping_base_url,
        Duration::from_millis(config.downstream.shipping_timeout_ms),
    )?);
    let cart = Arc::new(CartClient::new(
        &config.downstream.cart_base_url,
        Duration::from_millis(config.downstream.cart_timeout_ms),
    )?);

    let details = Arc::new(OrderAggregator::new(orders.clone(), shipping));
    let state = Arc::new(AppState::new(orders, details, cart));
    let identity = Arc::new(IdentityVerifier::new(&config.auth.jwt_secret));

    let app = gateway::build_router(state, identity);
    gateway::run_server(&config.gateway, app).await
}
