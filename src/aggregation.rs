//! Order details: the stored order joined with its shipment, if any.
//!
//! The shipment is strictly optional. Provider failures are logged and the
//! details are returned without one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::downstream::{Shipment, ShipmentLookup};
use crate::order::{Order, OrderError, OrderService};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetails {
    pub order: Order,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment: Option<Shipment>,
}

pub struct OrderAggregator {
    orders: Arc<OrderService>,
    shipping: Arc<dyn ShipmentLookup>,
}

impl OrderAggregator {
    pub fn new(orders: Arc<OrderService>, shipping: Arc<dyn ShipmentLookup>) -> Self {
        Self { orders, shipping }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_order_details(&self, id: &str) -> Result<OrderDetails, OrderError> {
        let order = self.orders.get_order(id).await?;

        let shipment = match self.shipping.get_shipment(&order.id).await {
            Ok(shipment) => shipment,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Shipment lookup failed, returning order without shipment");
                None
            }
        };

        Ok(OrderDetails { order, shipment })
    }
}
