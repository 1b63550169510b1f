//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::aggregation::OrderDetails;
use crate::downstream::Shipment;
use crate::gateway::handlers::{CreateOrderBody, HealthResponse, UpdateStatusRequest};
use crate::order::{Order, OrderItem, OrderItemRequest};

/// HS256 bearer token issued by the identity provider
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Service API",
        version = "1.0.0",
        description = "Order creation, listing and shipment-aware order details.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::order::list_orders,
        crate::gateway::handlers::order::create_order,
        crate::gateway::handlers::order::get_order,
        crate::gateway::handlers::order::get_order_details,
        crate::gateway::handlers::internal::update_order_status,
    ),
    components(
        schemas(
            HealthResponse,
            Order,
            OrderItem,
            OrderItemRequest,
            CreateOrderBody,
            OrderDetails,
            Shipment,
            UpdateStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Orders", description = "Order placement and queries"),
        (name = "Internal", description = "Service-to-service endpoints"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
