//! Wire records for catalog API responses and their conversion to domain types.
//!
//! Responses are first deserialized into loosely-typed records, then checked
//! field by field. A record that fails a check fails the whole fetch.

use rust_decimal::Decimal;
use serde::Deserialize;

use shopfront_core::{Category, Price, Product, ProductId, Rating};

use super::CatalogError;

/// A product as returned by `GET /products` and `GET /products/{id}`.
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<RatingRecord>,
}

/// The `rating` object of a product record.
#[derive(Debug, Deserialize)]
pub struct RatingRecord {
    pub rate: Decimal,
    pub count: u32,
}

impl TryFrom<ProductRecord> for Product {
    type Error = CatalogError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let id = i32::try_from(record.id)
            .map(ProductId::new)
            .map_err(|_| CatalogError::Invalid(format!("product id {} out of range", record.id)))?;

        if record.title.trim().is_empty() {
            return Err(CatalogError::Invalid(format!("product {id} has an empty title")));
        }

        let price = Price::new(record.price)
            .map_err(|e| CatalogError::Invalid(format!("product {id}: {e}")))?;

        Ok(Self {
            id,
            title: record.title,
            price,
            category: Category::new(record.category),
            image: record.image,
            description: record.description,
            rating: record.rating.map(|r| Rating {
                rate: r.rate,
                count: r.count,
            }),
        })
    }
}

/// Convert a product collection, failing on the first invalid record.
pub fn convert_products(records: Vec<ProductRecord>) -> Result<Vec<Product>, CatalogError> {
    records.into_iter().map(Product::try_from).collect()
}

/// Convert a category collection. Blank labels are rejected.
pub fn convert_categories(labels: Vec<String>) -> Result<Vec<Category>, CatalogError> {
    labels
        .into_iter()
        .map(|label| {
            if label.trim().is_empty() {
                Err(CatalogError::Invalid("blank category label".to_string()))
            } else {
                Ok(Category::new(label))
            }
        })
        .collect()
}
