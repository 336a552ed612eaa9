//! Shopping cart state.
//!
//! A [`Cart`] maps product IDs to quantities. Adding is incremental (one unit
//! per call) while removing is total: the product's key disappears no matter
//! how many units it held. A key present in the cart always has a quantity of
//! at least one.
//!
//! The serialized form is a JSON object keyed by the product ID's text form:
//!
//! ```json
//! {"1": 2, "5": 1}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// Errors that can occur when restoring a [`Cart`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// A stored entry has a quantity of zero.
    #[error("cart entry for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// Product ID to quantity mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ProductId, u32>",
    into = "BTreeMap<ProductId, u32>"
)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a cart from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not an object of product IDs to positive
    /// integer quantities.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the cart to its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add one unit of `product_id`, returning its new quantity.
    pub fn add(&mut self, product_id: ProductId) -> u32 {
        let quantity = self.lines.entry(product_id).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Remove `product_id` entirely, returning the quantity it held.
    pub fn remove(&mut self, product_id: ProductId) -> Option<u32> {
        self.lines.remove(&product_id)
    }

    /// Quantity held for `product_id` (zero when absent).
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.lines.get(&product_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lines.contains_key(&product_id)
    }

    /// Total number of units across all products.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.values().map(|&q| u64::from(q)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The products of `catalog` that are in the cart, in catalog order.
    #[must_use]
    pub fn items<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|p| self.contains(p.id)).collect()
    }

    /// Price of every unit of `product` held in the cart.
    #[must_use]
    pub fn line_total(&self, product: &Product) -> Price {
        product.price.times(self.quantity(product.id))
    }

    /// Sum of the line totals of the cart's products found in `catalog`.
    #[must_use]
    pub fn subtotal(&self, catalog: &[Product]) -> Price {
        self.items(catalog)
            .into_iter()
            .map(|p| self.line_total(p))
            .sum()
    }
}

impl TryFrom<BTreeMap<ProductId, u32>> for Cart {
    type Error = CartError;

    fn try_from(lines: BTreeMap<ProductId, u32>) -> Result<Self, Self::Error> {
        if let Some((&id, _)) = lines.iter().find(|&(_, &q)| q == 0) {
            return Err(CartError::ZeroQuantity(id));
        }
        Ok(Self { lines })
    }
}

impl From<Cart> for BTreeMap<ProductId, u32> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
