use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use super::{CartClearer, DownstreamError, trim_base_url};

const SERVICE: &str = "cart";

/// HTTP client for `DELETE {base}/cart`
pub struct CartClient {
    client: reqwest::Client,
    base_url: String,
}

impl CartClient {
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
impl CartClearer for CartClient {
    async fn clear_cart(&self, authorization: Option<&str>) -> Result<(), DownstreamError> {
        let mut request = self.client.delete(format!("{}/cart", self.base_url));
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .map_err(|source| DownstreamError::Request {
                service: SERVICE,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownstreamError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
