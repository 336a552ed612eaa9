//! Cart route handlers and the cart modal's display data.
//!
//! The cart lives in the visitor's session. Add and remove are plain form
//! posts that mutate the saved cart and redirect back to the page they came
//! from; the modal itself is rendered by the listing and detail pages.

use axum::{Form, response::Redirect};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{Product, ProductId};

use crate::cart_store::{CartStorage, CartStore};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::Notice;
use crate::models::session::set_notice;

/// Characters of a title kept in the cart modal.
const CART_TITLE_CHARS: usize = 30;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
}

/// Cart modal display data for templates.
#[derive(Clone)]
pub struct CartView {
    /// Whether the modal is shown.
    pub open: bool,
    pub items: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: String,
    /// Show `= $total` after each line.
    pub show_line_totals: bool,
    /// Link that opens or closes the modal.
    pub toggle_href: String,
    /// Link that closes the modal.
    pub close_href: String,
    /// Where remove buttons send the visitor back to.
    pub return_to: String,
}

impl CartView {
    /// Cart modal as shown on the product listing: titles cut to 30
    /// characters followed by an ellipsis, `$price × qty` per line.
    pub fn listing<S: CartStorage>(
        store: &CartStore<S>,
        catalog: &[Product],
        links: CartLinks,
    ) -> Self {
        Self::build(store, catalog, links, false)
    }

    /// Cart modal as shown on a detail page: titles cut to 30 characters,
    /// `$price × qty = $total` per line.
    pub fn detail<S: CartStorage>(
        store: &CartStore<S>,
        catalog: &[Product],
        links: CartLinks,
    ) -> Self {
        Self::build(store, catalog, links, true)
    }

    fn build<S: CartStorage>(
        store: &CartStore<S>,
        catalog: &[Product],
        links: CartLinks,
        show_line_totals: bool,
    ) -> Self {
        let items = store
            .cart_items(catalog)
            .into_iter()
            .map(|product| {
                let short = product.short_title(CART_TITLE_CHARS);
                CartLineView {
                    id: product.id.to_string(),
                    title: if show_line_totals {
                        short.to_string()
                    } else {
                        format!("{short}...")
                    },
                    image: product.image.clone(),
                    price: product.price.to_string(),
                    quantity: store.quantity(product.id),
                    line_price: store.line_total(product).to_string(),
                }
            })
            .collect();

        Self {
            open: links.open,
            items,
            item_count: store.cart_count(),
            subtotal: store.subtotal(catalog).to_string(),
            show_line_totals,
            toggle_href: if links.open {
                links.closed_href.clone()
            } else {
                links.open_href.clone()
            },
            close_href: links.closed_href,
            return_to: links.open_href,
        }
    }
}

/// The two URLs of the page hosting the cart modal.
pub struct CartLinks {
    pub open: bool,
    /// Page URL with the modal open.
    pub open_href: String,
    /// Page URL with the modal closed.
    pub closed_href: String,
}

impl CartLinks {
    /// Links for a page at `path` with optional extra query pairs.
    #[must_use]
    pub fn for_page(path: &str, query: &[(&str, &str)], open: bool) -> Self {
        let mut open_query = query.to_vec();
        open_query.push(("cart", "open"));
        Self {
            open,
            open_href: with_query(path, &open_query),
            closed_href: with_query(path, query),
        }
    }
}

/// Build `path?k=v&...` with URL-encoded values.
#[must_use]
pub fn with_query(path: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let pairs = query
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{pairs}")
}

// =============================================================================
// Form Handlers
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Page to return to.
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
    /// Page to return to.
    pub return_to: Option<String>,
}

/// Add one unit of a product to the cart.
///
/// Sets a two-second confirmation notice and redirects back. The detail
/// page names the product in the notice using its catalog title.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Result<Redirect> {
    let product_id = parse_product_id(&form.product_id)?;

    let mut store = CartStore::load(session.clone()).await;
    store.add_to_cart(product_id).await?;

    set_notice(&session, &Notice::added_to_cart(product_id, Utc::now())).await;
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", &form.product_id)]),
    );

    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref())))
}

/// Remove a product from the cart, whatever its quantity.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let product_id = parse_product_id(&form.product_id)?;

    let mut store = CartStore::load(session).await;
    store.remove_from_cart(product_id).await?;
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", &form.product_id)]),
    );

    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref())))
}

fn parse_product_id(value: &str) -> Result<ProductId> {
    value
        .parse::<ProductId>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Only same-site paths are followed; anything else returns to the listing.
fn safe_return_to(return_to: Option<&str>) -> String {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        _ => "/products".to_string(),
    }
}
