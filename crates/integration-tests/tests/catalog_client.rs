//! Integration tests for the catalog client against a fake catalog API.

#![allow(clippy::unwrap_used)]

use shopfront_core::ProductId;
use shopfront_integration_tests::{
    CatalogBehavior, INVALID_PRODUCT_ID, UNKNOWN_PRODUCT_ID, catalog_config, spawn_catalog,
};
use shopfront_storefront::catalog::{CatalogClient, CatalogError};
use url::Url;

async fn client(behavior: CatalogBehavior) -> CatalogClient {
    let url = spawn_catalog(behavior).await;
    CatalogClient::new(&catalog_config(url)).unwrap()
}

#[tokio::test]
async fn test_load_fetches_products_and_categories() {
    let catalog = client(CatalogBehavior::default()).await;

    let snapshot = catalog.load().await;

    assert_eq!(snapshot.products.len(), 5);
    let categories: Vec<_> = snapshot.categories.iter().map(|c| c.as_str()).collect();
    assert_eq!(categories, ["electronics", "jewelery"]);
    assert_eq!(snapshot.products[0].id, ProductId::new(5));
    assert_eq!(snapshot.products[4].price.to_string(), "$109.99");
}

#[tokio::test]
async fn test_failed_products_fetch_does_not_block_categories() {
    let catalog = client(CatalogBehavior {
        products_fail: true,
        ..CatalogBehavior::default()
    })
    .await;

    let snapshot = catalog.load().await;

    assert!(snapshot.products.is_empty());
    assert_eq!(snapshot.categories.len(), 2);
}

#[tokio::test]
async fn test_failed_categories_fetch_does_not_block_products() {
    let catalog = client(CatalogBehavior {
        categories_fail: true,
        ..CatalogBehavior::default()
    })
    .await;

    let snapshot = catalog.load().await;

    assert_eq!(snapshot.products.len(), 5);
    assert!(snapshot.categories.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_reports_status() {
    let catalog = client(CatalogBehavior {
        products_fail: true,
        ..CatalogBehavior::default()
    })
    .await;

    let err = catalog.products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_catalog_loads_empty() {
    // Bind and release a port so nothing is listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}")).unwrap();
    let catalog = CatalogClient::new(&catalog_config(url)).unwrap();

    let snapshot = catalog.load().await;
    assert!(snapshot.products.is_empty());
    assert!(snapshot.categories.is_empty());
}

#[tokio::test]
async fn test_product_by_id() {
    let catalog = client(CatalogBehavior::default()).await;

    let product = catalog.product(ProductId::new(9)).await.unwrap();

    assert_eq!(
        product.title,
        "WD 2TB Elements Portable External Hard Drive - USB 3.0"
    );
    assert_eq!(product.category.as_str(), "electronics");
    assert_eq!(product.price.to_fixed(), "64.00");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let catalog = client(CatalogBehavior::default()).await;

    let err = catalog
        .product(ProductId::new(UNKNOWN_PRODUCT_ID))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_invalid_product_record_is_rejected() {
    let catalog = client(CatalogBehavior::default()).await;

    let err = catalog
        .product(ProductId::new(INVALID_PRODUCT_ID))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Invalid(_)), "got {err:?}");
}
