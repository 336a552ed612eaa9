//! Catalog product and category types.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A category label as returned by the catalog.
///
/// The label [`Category::ALL`] is synthetic: the catalog never returns it, the
/// category filter injects it to mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// The synthetic "no filter" label.
    pub const ALL: &'static str = "all";

    /// Create a category from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The synthetic "all" category.
    #[must_use]
    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    /// Whether this is the synthetic "all" category.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    /// The raw label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label for a category tab: `"All"`, otherwise the label with its first
    /// letter upper-cased (`"men's clothing"` becomes `"Men's clothing"`).
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.is_all() {
            return "All".to_string();
        }
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Average customer rating reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: Decimal,
    /// Number of ratings.
    pub count: u32,
}

/// A catalog product.
///
/// Products are immutable once fetched; pages hold them for the lifetime of a
/// single page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub category: Category,
    /// Image URI.
    pub image: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// The first `max_chars` characters of the title.
    ///
    /// Cuts on character boundaries, so multi-byte titles never split a
    /// code point. Titles shorter than `max_chars` are returned whole.
    #[must_use]
    pub fn short_title(&self, max_chars: usize) -> &str {
        truncate_chars(&self.title, max_chars)
    }
}

/// The first `max_chars` characters of `s`.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    s.char_indices()
        .nth(max_chars)
        .and_then(|(byte_idx, _)| s.get(..byte_idx))
        .unwrap_or(s)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::all().display_label(), "All");
        assert_eq!(Category::new("electronics").display_label(), "Electronics");
        assert_eq!(
            Category::new("men's clothing").display_label(),
            "Men's clothing"
        );
        assert_eq!(Category::new("").display_label(), "");
        assert!(Category::from("all").is_all());
        assert!(!Category::from("jewelery").is_all());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
    }

    #[test]
    fn test_product_deserializes_catalog_shape() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price.to_string(), "$109.95");
        assert_eq!(product.category.as_str(), "men's clothing");
        assert_eq!(product.rating.unwrap().count, 120);
        assert_eq!(product.short_title(11), "Fjallraven ");
    }
}
