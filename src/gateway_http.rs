//! HTTP client for the remote product service.
//!
//! Implements [`CatalogGateway`] over two endpoints:
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `GET`  | `/products` | none | JSON array of products |
//! | `POST` | `/products/filter` | translated facet map | JSON array of products |
//!
//! # Failure classes
//!
//! - request could not be sent or timed out → [`GatewayError::Transport`]
//! - non-2xx status → [`GatewayError::Server`] (body kept for diagnostics)
//! - 2xx but not a JSON array of products → [`GatewayError::Malformed`]
//!
//! An empty array is a successful response.
//!
//! # Retry Strategy
//!
//! Transport errors and 5xx responses are retried up to
//! `gateway.max_retries` times with exponential backoff (100ms, 200ms,
//! 400ms, ... capped at 3.2s). 4xx and malformed bodies fail immediately.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use shelf_core::facets::FacetMap;
use shelf_core::gateway::{CatalogGateway, GatewayError};
use shelf_core::models::Product;

use crate::config::GatewayConfig;

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> Result<Vec<Product>, GatewayError> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            match send_once(build()).await {
                Ok(products) => return Ok(products),
                Err(err) if err.is_retryable() => {
                    tracing::debug!(attempt, error = %err, "gateway call failed; retrying");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err.unwrap_or_else(|| GatewayError::transport("gateway call failed after retries")))
    }
}

async fn send_once(request: reqwest::RequestBuilder) -> Result<Vec<Product>, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::transport(e.to_string()))?;

    if !status.is_success() {
        return Err(GatewayError::Server {
            status: status.as_u16(),
            body,
        });
    }

    parse_product_array(&body)
}

/// Decode a response body that must be a JSON array of products.
pub fn parse_product_array(body: &str) -> Result<Vec<Product>, GatewayError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::malformed(format!("invalid JSON: {}", e)))?;

    if !json.is_array() {
        return Err(GatewayError::malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&json)
        )));
    }

    serde_json::from_value(json)
        .map_err(|e| GatewayError::malformed(format!("invalid product record: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError> {
        let url = self.url("/products");
        tracing::debug!(%url, "fetching catalog");
        self.send_with_retry(|| self.client.get(&url)).await
    }

    async fn filter_products(&self, facets: &FacetMap) -> Result<Vec<Product>, GatewayError> {
        let url = self.url("/products/filter");
        tracing::debug!(%url, ?facets, "requesting filtered catalog");
        self.send_with_retry(|| self.client.post(&url).json(facets))
            .await
    }
}
