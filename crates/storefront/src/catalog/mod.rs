//! Remote catalog API client.
//!
//! # API
//!
//! ```text
//! GET /products             - Every product
//! GET /products/categories  - Every category label
//! GET /products/{id}        - One product (empty body when unknown)
//! ```
//!
//! There is no caching: every page load fetches fresh data. Collection
//! fetches are issued concurrently and degrade independently to an empty
//! collection on failure, so one broken endpoint never hides the other.

pub mod conversions;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use shopfront_core::{Category, Product, ProductId};

use crate::config::CatalogConfig;
use conversions::{ProductRecord, convert_categories, convert_products};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Unexpected status {status} from {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed but failed validation.
    #[error("Invalid record: {0}")]
    Invalid(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Products and categories fetched for one page view.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Client for the remote catalog API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: builder.build()?,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Issue a GET request and parse the JSON body.
    ///
    /// Returns `Ok(None)` for a 404, an empty body or a `null` body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                path: path.to_string(),
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Option<T>>(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any record is invalid.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let records: Vec<ProductRecord> = self
            .get_json("/products")
            .await?
            .ok_or_else(|| CatalogError::NotFound("/products".to_string()))?;
        let products = convert_products(records)?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch every category label.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a label is blank.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let labels: Vec<String> = self
            .get_json("/products/categories")
            .await?
            .ok_or_else(|| CatalogError::NotFound("/products/categories".to_string()))?;
        let categories = convert_categories(labels)?;
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the catalog has no such product,
    /// or another error if the request fails or the record is invalid.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let record: ProductRecord = self
            .get_json(&format!("/products/{id}"))
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))?;
        Product::try_from(record)
    }

    /// Fetch products and categories concurrently.
    ///
    /// A failed fetch is logged and yields an empty collection; the other
    /// fetch is unaffected.
    #[instrument(skip(self))]
    pub async fn load(&self) -> CatalogSnapshot {
        let (products, categories) = tokio::join!(self.products(), self.categories());

        let products = products.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch products: {e}");
            Vec::new()
        });
        let categories = categories.unwrap_or_else(|e| {
            tracing::error!("Failed to fetch categories: {e}");
            Vec::new()
        });

        CatalogSnapshot {
            products,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = CatalogError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            path: "/products".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 502 Bad Gateway from /products"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CatalogClient::new(&CatalogConfig::default());
        assert!(client.is_ok());
        if let Ok(client) = client {
            assert_eq!(client.inner.base_url, "https://fakestoreapi.com");
        }
    }
}
