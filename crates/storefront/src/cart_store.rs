//! Cart store: the visitor's [`Cart`] synchronized to durable storage.
//!
//! Every mutation writes the full cart back to storage under
//! [`CART_STORAGE_KEY`], one write per mutation and only after the mutation
//! succeeded. On load, a missing, corrupt or incompatible stored value is
//! treated as an empty cart.
//!
//! Storage is reached through the small [`CartStorage`] interface. Handlers
//! use the visitor's [`Session`]; tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tower_sessions::Session;

use shopfront_core::{Cart, Price, Product, ProductId};

/// Storage name of the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors that can occur when reading or writing cart storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Cart could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value storage holding serialized blobs.
pub trait CartStorage {
    /// Read the blob stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl CartStorage for Session {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(Session::get::<String>(self, key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        Ok(self.insert(key, value).await?)
    }
}

/// In-memory storage for tests and previews.
///
/// Clones share the same map, like two handles on one browser's storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// The raw blob under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Number of `set` calls made so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A visitor's cart, loaded from and persisted to `S`.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartStore<S> {
    /// Restore the cart from storage.
    ///
    /// Read failures and undecodable blobs are logged and yield an empty cart.
    pub async fn load(storage: S) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY).await {
            Ok(Some(blob)) => Cart::from_json(&blob).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable saved cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read saved cart");
                Cart::new()
            }
        };

        Self { storage, cart }
    }

    /// Add one unit of `product_id` and persist. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written back to storage.
    pub async fn add_to_cart(&mut self, product_id: ProductId) -> Result<u32, StorageError> {
        let quantity = self.cart.add(product_id);
        self.persist().await?;
        tracing::debug!(%product_id, quantity, "Added to cart");
        Ok(quantity)
    }

    /// Remove `product_id` entirely and persist. Returns the removed quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written back to storage.
    pub async fn remove_from_cart(
        &mut self,
        product_id: ProductId,
    ) -> Result<Option<u32>, StorageError> {
        let removed = self.cart.remove(product_id);
        self.persist().await?;
        tracing::debug!(%product_id, ?removed, "Removed from cart");
        Ok(removed)
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// The products of `catalog` that are in the cart, in catalog order.
    #[must_use]
    pub fn cart_items<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        self.cart.items(catalog)
    }

    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.cart.quantity(product_id)
    }

    #[must_use]
    pub fn line_total(&self, product: &Product) -> Price {
        self.cart.line_total(product)
    }

    #[must_use]
    pub fn subtotal(&self, catalog: &[Product]) -> Price {
        self.cart.subtotal(catalog)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let blob = self.cart.to_json()?;
        self.storage.set(CART_STORAGE_KEY, blob).await
    }
}
