//! Remote catalog gateway abstraction.
//!
//! The [`CatalogGateway`] trait is the only way the pipeline reaches the
//! product service: one call for the full list, one for a filtered list.
//! The HTTP implementation lives in the application crate; this module
//! provides [`MemoryGateway`] for tests and offline use.
//!
//! An empty product array is a successful response. Every failure mode is a
//! [`GatewayError`] variant and is absorbed by the catalog orchestrator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::facets::{translate, FacetMap, PriceBucket};
use crate::models::{Facet, Product};

/// Errors a gateway call can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request could not be sent or timed out.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The service answered with a non-2xx status.
    #[error("server error {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, if it was readable as text.
        body: String,
    },

    /// The service answered 2xx but the body was not a JSON product array.
    #[error("malformed response: {message}")]
    Malformed {
        /// Description of what could not be decoded.
        message: String,
    },
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        GatewayError::Malformed {
            message: message.into(),
        }
    }

    /// Transport failures and 5xx responses are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { .. } => true,
            GatewayError::Server { status, .. } => *status >= 500,
            GatewayError::Malformed { .. } => false,
        }
    }
}

/// Contract with the external product service.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// `GET /products`: the full, unfiltered catalog.
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError>;

    /// `POST /products/filter` with the translated facet map as body.
    async fn filter_products(&self, facets: &FacetMap) -> Result<Vec<Product>, GatewayError>;
}

/// In-memory gateway over a fixed product list.
///
/// Filters the way the product service does for the facets a [`Product`]
/// carries: brand codes against the translated product brand, and price
/// buckets against the price. Color and size have no product attribute
/// and do not narrow the result.
pub struct MemoryGateway {
    products: Vec<Product>,
    failure: Mutex<Option<GatewayError>>,
    fetch_calls: AtomicUsize,
    filter_calls: AtomicUsize,
    last_filter: Mutex<Option<FacetMap>>,
}

impl MemoryGateway {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            failure: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            filter_calls: AtomicUsize::new(0),
            last_filter: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `error` (or succeed again with `None`).
    pub fn set_failure(&self, error: Option<GatewayError>) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = error;
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn filter_calls(&self) -> usize {
        self.filter_calls.load(Ordering::SeqCst)
    }

    /// The facet map received by the most recent filter call.
    pub fn last_filter(&self) -> Option<FacetMap> {
        self.last_filter.lock().ok().and_then(|f| f.clone())
    }

    fn scripted_failure(&self) -> Result<(), GatewayError> {
        match self.failure.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            },
            Err(_) => Err(GatewayError::transport("gateway state poisoned")),
        }
    }
}

/// True when `product` satisfies every facet in `facets` this gateway can evaluate.
pub fn product_matches(product: &Product, facets: &FacetMap) -> bool {
    facets.iter().all(|(facet, codes)| match facet {
        Facet::Brand => {
            let code = translate(Facet::Brand, &product.brand);
            codes.iter().any(|c| *c == code)
        }
        Facet::Price => codes.iter().any(|c| match PriceBucket::parse(c) {
            Some(bucket) => bucket.contains(product.price),
            None => false,
        }),
        Facet::Color | Facet::Size => {
            tracing::debug!(facet = %facet, "facet has no product attribute; not narrowing");
            true
        }
    })
}

#[async_trait]
impl CatalogGateway for MemoryGateway {
    async fn fetch_products(&self) -> Result<Vec<Product>, GatewayError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.scripted_failure()?;
        Ok(self.products.clone())
    }

    async fn filter_products(&self, facets: &FacetMap) -> Result<Vec<Product>, GatewayError> {
        self.filter_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_filter.lock() {
            *last = Some(facets.clone());
        }
        self.scripted_failure()?;
        Ok(self
            .products
            .iter()
            .filter(|p| product_matches(p, facets))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Samba", "아디다스", 90000),
            Product::new(2, "Air Force", "나이키", 130000),
            Product::new(3, "Air Max", "나이키", 179000),
            Product::new(4, "Kayano", "아식스", 209000),
            Product::new(5, "Speedcross", "Unlisted", 450000),
        ]
    }

    #[tokio::test]
    async fn test_memory_gateway_filters_price_bucket() {
        let gw = MemoryGateway::new(catalog());
        let mut facets = FacetMap::new();
        facets.insert(Facet::Price, vec!["10만원 - 20만원".to_string()]);
        let result = gw.filter_products(&facets).await.unwrap();
        let prices: Vec<u64> = result.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![130000, 179000]);
        assert_eq!(gw.filter_calls(), 1);
        assert_eq!(gw.last_filter(), Some(facets));
    }

    #[tokio::test]
    async fn test_memory_gateway_filters_brand_codes() {
        let gw = MemoryGateway::new(catalog());
        let mut facets = FacetMap::new();
        facets.insert(Facet::Brand, vec!["Nike".to_string(), "Others".to_string()]);
        let result = gw.filter_products(&facets).await.unwrap();
        let ids: Vec<String> = result.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "3", "5"]);
    }

    #[tokio::test]
    async fn test_memory_gateway_scripted_failure() {
        let gw = MemoryGateway::new(catalog());
        gw.set_failure(Some(GatewayError::transport("connection refused")));
        assert!(gw.fetch_products().await.is_err());
        gw.set_failure(None);
        assert_eq!(gw.fetch_products().await.unwrap().len(), 5);
        assert_eq!(gw.fetch_calls(), 2);
    }

    #[test]
    fn test_retryable_classes() {
        assert!(GatewayError::transport("timeout").is_retryable());
        assert!(GatewayError::Server {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::Server {
            status: 404,
            body: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::malformed("not an array").is_retryable());
    }
}
