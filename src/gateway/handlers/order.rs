//! Order handlers (list, get, details, create)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::aggregation::OrderDetails;
use crate::auth::AuthenticatedUser;
use crate::order::{CreateOrderRequest, Order, OrderItemRequest};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ValidatedJson, created, error_codes, ok};

/// Order creation body. Any client-supplied user id is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderBody {
    pub items: Vec<OrderItemRequest>,
}

fn require_user(user: Option<Extension<AuthenticatedUser>>) -> Result<AuthenticatedUser, ApiError> {
    user.map(|Extension(user)| user).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            error_codes::MISSING_AUTH,
            "Authentication required",
        )
    })
}

/// List the caller's orders, newest first
///
/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Caller's orders, newest first", body = Vec<Order>),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthenticatedUser>>,
) -> ApiResult<Vec<Order>> {
    let user = require_user(user)?;
    ok(state.orders.list_orders(&user.user_id).await?)
}

/// Get one order with its items
///
/// GET /api/v1/orders/{id}
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    ok(state.orders.get_order(&id).await?)
}

/// Get an order together with its shipment, when one exists
///
/// GET /api/v1/orders/{id}/details
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/details",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with optional shipment", body = OrderDetails),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders"
)]
pub async fn get_order_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<OrderDetails> {
    ok(state.details.get_order_details(&id).await?)
}

/// Create an order for the caller
///
/// POST /api/v1/orders
///
/// After the order commits, the caller's cart is cleared on a best-effort
/// basis. A cart failure is logged and does not change the response.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Invalid order or malformed body"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<AuthenticatedUser>>,
    headers: HeaderMap,
    ValidatedJson(body): ValidatedJson<CreateOrderBody>,
) -> ApiResult<Order> {
    let user = require_user(user)?;

    let order = state
        .orders
        .create_order(CreateOrderRequest::new(user.user_id, body.items))
        .await?;

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = state.cart.clear_cart(authorization).await {
        tracing::warn!(order_id = %order.id, error = %e, "Failed to clear cart after order creation");
    }

    created(order)
}
