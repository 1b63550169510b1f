use std::sync::Arc;

use crate::aggregation::OrderAggregator;
use crate::downstream::CartClearer;
use crate::order::OrderService;

/// Gateway shared state, built once at startup
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub details: Arc<OrderAggregator>,
    pub cart: Arc<dyn CartClearer>,
}

impl AppState {
    pub fn new(
        orders: Arc<OrderService>,
        details: Arc<OrderAggregator>,
        cart: Arc<dyn CartClearer>,
    ) -> Self {
        Self {
            orders,
            details,
            cart,
        }
    }
}
