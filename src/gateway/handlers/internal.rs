//! Internal (service-to-service) endpoints
//!
//! Mounted under `/internal`, outside the public identity layer. Exposure is
//! expected to be limited to the cluster network.

use std::sync::Arc;

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiResult, ValidatedJson, ok};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "shipped")]
    pub status: String,
}

/// Overwrite an order's status
///
/// PUT /internal/orders/{id}/status
#[utoipa::path(
    put,
    path = "/internal/orders/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateStatusRequest),
        (status = 400, description = "Empty status or malformed body"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Internal"
)]
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<UpdateStatusRequest> {
    state.orders.update_order_status(&id, &req.status).await?;
    ok(req)
}
