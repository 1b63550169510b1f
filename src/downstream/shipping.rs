use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DownstreamError, ShipmentLookup, trim_base_url};

const SERVICE: &str = "shipping";

/// Shipment as reported by the shipping-status provider
///
/// Ids are the provider's integer keys. Dates are passed through as the
/// provider formats them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Shipment {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = 42)]
    pub order_id: i64,
    pub tracking_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[schema(example = "in_transit")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2024-01-05")]
    pub estimated_delivery: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// HTTP client for `GET {base}/orders/{order_id}`
pub struct ShippingClient {
    client: reqwest::Client,
    base_url: String,
}

impl ShippingClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DownstreamError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DownstreamError::Client)?;

        Ok(Self {
            client,
            base_url: trim_base_url(base_url),
        })
    }
}

#[async_trait]
impl ShipmentLookup for ShippingClient {
    async fn get_shipment(&self, order_id: &str) -> Result<Option<Shipment>, DownstreamError> {
        let url = format!("{}/orders/{}", self.base_url, order_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| DownstreamError::Request {
                service: SERVICE,
                source,
            })?;

        match response.status() {
            StatusCode::OK => {
                let shipment = response
                    .json::<Shipment>()
                    .await
                    .map_err(|source| DownstreamError::Decode {
                        service: SERVICE,
                        source,
                    })?;
                Ok(Some(shipment))
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(order_id, "No shipment for order");
                Ok(None)
            }
            status => Err(DownstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downstream::spawn_test_server;
    use axum::Router;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;

    /// Body shape the shipping service emits
    const PROVIDER_BODY: &str = r#"{"id":7,"order_id":1,"tracking_number":"TRK123","carrier":"UPS","status":"in_transit","estimated_delivery":"2024-01-05","created_at":"2024-01-01 10:00:00","updated_at":"2024-01-02 08:30:00"}"#;

    fn json_body(body: &'static str) -> Response {
        ([(axum::http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }

    async fn provider(Path(order_id): Path<String>) -> Response {
        match order_id.as_str() {
            "1" => json_body(PROVIDER_BODY),
            "2" => AxumStatus::NOT_FOUND.into_response(),
            "3" => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
            "4" => "not json".into_response(),
            "5" => json_body(r#"{"id":8,"order_id":5,"tracking_number":"TRK5","status":"label_created","created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-01T00:00:00Z"}"#),
            _ => {
                tokio::time::sleep(Duration::from_millis(500)).await;
                json_body(PROVIDER_BODY)
            }
        }
    }

    async fn client(timeout: Duration) -> ShippingClient {
        let router = Router::new().route("/api/v1/shipping/orders/{id}", get(provider));
        let base = spawn_test_server(router).await;
        ShippingClient::new(&format!("{}/api/v1/shipping/", base), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_shipment_found() {
        let client = client(Duration::from_secs(5)).await;
        let shipment = client.get_shipment("1").await.unwrap().unwrap();
        assert_eq!(shipment.id, 7);
        assert_eq!(shipment.order_id, 1);
        assert_eq!(shipment.tracking_number, "TRK123");
        assert_eq!(shipment.carrier.as_deref(), Some("UPS"));
        assert_eq!(shipment.estimated_delivery.as_deref(), Some("2024-01-05"));
        assert_eq!(shipment.created_at, "2024-01-01 10:00:00");
    }

    #[tokio::test]
    async fn test_optional_fields_may_be_absent() {
        let client = client(Duration::from_secs(5)).await;
        let shipment = client.get_shipment("5").await.unwrap().unwrap();
        assert_eq!(shipment.order_id, 5);
        assert!(shipment.carrier.is_none());
        assert!(shipment.estimated_delivery.is_none());
    }


    #[tokio::test]
    async fn test_not_found_is_absent() {
        let client = client(Duration::from_secs(5)).await;
        assert!(client.get_shipment("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let client = client(Duration::from_secs(5)).await;
        assert!(matches!(
            client.get_shipment("3").await,
            Err(DownstreamError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_bad_body_is_decode_error() {
        let client = client(Duration::from_secs(5)).await;
        assert!(matches!(
            client.get_shipment("4").await,
            Err(DownstreamError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_request_error() {
        let client = client(Duration::from_millis(50)).await;
        assert!(matches!(
            client.get_shipment("slow").await,
            Err(DownstreamError::Request { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_request_error() {
        let client = ShippingClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.get_shipment("1").await,
            Err(DownstreamError::Request { .. })
        ));
    }
}
