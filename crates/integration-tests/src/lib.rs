//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! Every test starts its own fake catalog API and storefront on ephemeral
//! local ports; nothing external is contacted.
//!
//! # Test Categories
//!
//! - `catalog_client` - Catalog client against the fake API
//! - `storefront_pages` - Pages and cart actions over HTTP

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;

use shopfront_storefront::config::{CatalogConfig, StorefrontConfig};
use shopfront_storefront::routes;
use shopfront_storefront::state::AppState;

/// Product id the fake catalog answers with a record that fails validation.
pub const INVALID_PRODUCT_ID: i32 = 99;

/// Product id the fake catalog does not know (answered `200` with no body).
pub const UNKNOWN_PRODUCT_ID: i32 = 42;

/// Which fake catalog endpoints fail with a 500.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogBehavior {
    pub products_fail: bool,
    pub categories_fail: bool,
}

/// Five products across two categories: three electronics, two jewelery.
#[must_use]
pub fn fixture_products() -> Value {
    json!([
        {
            "id": 5,
            "title": "John Hardy Womens Legends Naga Gold and Silver Dragon Station Chain Bracelet",
            "price": 695,
            "description": "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        },
        {
            "id": 6,
            "title": "Solid Gold Petite Micropave",
            "price": 168,
            "description": "Satisfaction Guaranteed. Return or exchange any order within 30 days.",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/61sbMiUnoGL._AC_UL640_QL65_ML3_.jpg",
            "rating": { "rate": 3.9, "count": 70 }
        },
        {
            "id": 9,
            "title": "WD 2TB Elements Portable External Hard Drive - USB 3.0",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility. Fast data transfers.",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg",
            "rating": { "rate": 3.3, "count": 203 }
        },
        {
            "id": 10,
            "title": "SanDisk SSD PLUS 1TB Internal SSD - SATA III 6 Gb/s",
            "price": 109,
            "description": "Easy upgrade for faster boot up, shutdown, application load and response.",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61U7T1koQqL._AC_SX679_.jpg",
            "rating": { "rate": 2.9, "count": 470 }
        },
        {
            "id": 11,
            "title": "Silicon Power 256GB SSD 3D NAND A55 SLC Cache Performance Boost SATA III 2.5",
            "price": 109.99,
            "description": "3D NAND flash are applied to deliver high transfer speeds.",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/71kWymZ+c+L._AC_SX679_.jpg",
            "rating": { "rate": 4.8, "count": 319 }
        }
    ])
}

/// Category labels matching [`fixture_products`].
#[must_use]
pub fn fixture_categories() -> Value {
    json!(["electronics", "jewelery"])
}

/// Start a fake catalog API and return its base URL.
pub async fn spawn_catalog(behavior: CatalogBehavior) -> Url {
    let app = Router::new()
        .route(
            "/products",
            get(move || async move {
                if behavior.products_fail {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                } else {
                    Json(fixture_products()).into_response()
                }
            }),
        )
        .route(
            "/products/categories",
            get(move || async move {
                if behavior.categories_fail {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                } else {
                    Json(fixture_categories()).into_response()
                }
            }),
        )
        .route("/products/{id}", get(product_by_id));

    let addr = serve(app).await;
    Url::parse(&format!("http://{addr}")).expect("valid catalog URL")
}

async fn product_by_id(Path(id): Path<String>) -> Response {
    if id == INVALID_PRODUCT_ID.to_string() {
        return Json(json!({
            "id": INVALID_PRODUCT_ID,
            "title": "Broken listing",
            "price": -1,
            "category": "electronics"
        }))
        .into_response();
    }

    let products = fixture_products();
    let found = products
        .as_array()
        .and_then(|all| all.iter().find(|p| p["id"].to_string() == id).cloned());

    // The real API answers unknown ids with an empty 200.
    found.map_or_else(|| String::new().into_response(), |p| Json(p).into_response())
}

/// Catalog client configuration pointing at `catalog_url`.
#[must_use]
pub fn catalog_config(catalog_url: Url) -> CatalogConfig {
    CatalogConfig {
        base_url: catalog_url,
        timeout: Some(Duration::from_secs(5)),
    }
}

/// A running storefront and the session database behind it.
///
/// The database directory is removed when the value is dropped.
pub struct TestShop {
    pub base_url: String,
    pub catalog_url: Url,
    sessions: TempDir,
}

impl TestShop {
    /// `SQLite` URL of this shop's session database.
    #[must_use]
    pub fn session_database_url(&self) -> String {
        session_database_url(&self.sessions)
    }

    /// Start a second storefront over the same catalog and session
    /// database, as after a restart. Returns its base URL.
    pub async fn restart(&self) -> String {
        spawn_storefront(self.catalog_url.clone(), self.session_database_url()).await
    }
}

fn session_database_url(dir: &TempDir) -> String {
    format!("sqlite://{}", dir.path().join("sessions.db").display())
}

/// Start a storefront backed by the catalog at `catalog_url` and the session
/// database at `session_database_url`, and return its base URL, e.g.
/// `http://127.0.0.1:54321`.
pub async fn spawn_storefront(catalog_url: Url, session_database_url: String) -> String {
    let config = StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        catalog: catalog_config(catalog_url),
        session_database_url,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");

    let addr = serve(routes::app(state)).await;
    format!("http://{addr}")
}

/// Start a fake catalog with `behavior` and a storefront in front of it,
/// with a fresh session database.
pub async fn spawn_shop(behavior: CatalogBehavior) -> TestShop {
    let catalog_url = spawn_catalog(behavior).await;
    let sessions = tempfile::tempdir().expect("Failed to create session directory");
    let base_url = spawn_storefront(catalog_url.clone(), session_database_url(&sessions)).await;

    TestShop {
        base_url,
        catalog_url,
        sessions,
    }
}

/// HTTP client that keeps the session cookie and follows redirects.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// HTTP client that keeps the session cookie and stops at redirects.
#[must_use]
pub fn browser_without_redirects() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    addr
}
