//! Downstream service clients
//!
//! The shipping-status provider (read-only shipment lookup) and the cart
//! service (best-effort cart clearing after checkout). Both sit behind
//! traits so handlers and the aggregator can be exercised with doubles.

pub mod cart;
pub mod shipping;

pub use cart::CartClient;
pub use shipping::{Shipment, ShippingClient};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownstreamError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("Failed to decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Shipment lookup by order id
#[async_trait]
pub trait ShipmentLookup: Send + Sync {
    /// `Ok(None)` when the provider has no shipment for the order
    async fn get_shipment(&self, order_id: &str) -> Result<Option<Shipment>, DownstreamError>;
}

/// Clears the caller's cart
#[async_trait]
pub trait CartClearer: Send + Sync {
    /// `authorization` is the caller's raw `Authorization` header, forwarded
    /// so the cart service can identify the user.
    async fn clear_cart(&self, authorization: Option<&str>) -> Result<(), DownstreamError>;
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Test doubles
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Shipment lookup with a fixed answer
    pub struct MockShipmentLookup {
        shipment: Mutex<Option<Shipment>>,
        fail: Mutex<bool>,
        calls: AtomicUsize,
    }

    impl MockShipmentLookup {
        pub fn new(shipment: Option<Shipment>) -> Self {
            Self {
                shipment: Mutex::new(shipment),
                fail: Mutex::new(false),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ShipmentLookup for MockShipmentLookup {
        async fn get_shipment(
            &self,
            order_id: &str,
        ) -> Result<Option<Shipment>, DownstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.fail.lock().unwrap() {
                return Err(DownstreamError::Status {
                    service: "shipping",
                    status: 503,
                });
            }
            Ok(self
                .shipment
                .lock()
                .unwrap()
                .clone()
                .map(|mut s| {
                    s.order_id = order_id.parse().unwrap_or_default();
                    s
                }))
        }
    }

    /// Cart clearer that records forwarded headers
    #[derive(Default)]
    pub struct MockCartClearer {
        headers: Mutex<Vec<Option<String>>>,
        fail: Mutex<bool>,
    }

    impl MockCartClearer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        pub fn calls(&self) -> usize {
            self.headers.lock().unwrap().len()
        }

        pub fn forwarded_headers(&self) -> Vec<Option<String>> {
            self.headers.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CartClearer for MockCartClearer {
        async fn clear_cart(&self, authorization: Option<&str>) -> Result<(), DownstreamError> {
            self.headers
                .lock()
                .unwrap()
                .push(authorization.map(str::to_string));
            if *self.fail.lock().unwrap() {
                return Err(DownstreamError::Status {
                    service: "cart",
                    status: 500,
                });
            }
            Ok(())
        }
    }
}

/// Serve `router` on an ephemeral local port, returning its base URL
#[cfg(test)]
pub(crate) async fn spawn_test_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{}", addr)
}
