pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;


use anyhow::Context;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{IdentityVerifier, identity_middleware};
use crate::config::GatewayConfig;
use state::AppState;

/// Assemble the full HTTP surface
///
/// Identity is bound on the caller-scoped routes (list, create). By-id reads
/// and the internal status endpoint are not identity-scoped.
pub fn build_router(state: Arc<AppState>, identity: Arc<IdentityVerifier>) -> Router {
    let caller_routes = Router::new()
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .layer(from_fn_with_state(identity, identity_middleware));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/orders/{id}", get(handlers::get_order))
        .route("/orders/{id}/details", get(handlers::get_order_details));

    let internal_routes =
        Router::new().route("/orders/{id}/status", put(handlers::update_order_status));

    Router::new()
        .nest("/api/v1", caller_routes.merge(public_routes))
        .nest("/internal", internal_routes)
        .with_state(state)
        // stateless, added after with_state
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until Ctrl-C / SIGTERM
pub async fn run_server(config: &GatewayConfig, app: Router) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "Order service listening");
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Order service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
