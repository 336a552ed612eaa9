//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopfront_core::{Category, CategoryFilter, Product, ProductId, category_tabs};

use crate::cart_store::CartStore;
use crate::filters;
use crate::models::VisibleNotice;
use crate::models::session::visible_notice;
use crate::routes::cart::{CartLinks, CartView, with_query};
use crate::state::AppState;

/// Characters of a title kept on a product card.
const CARD_TITLE_CHARS: usize = 40;

/// Rating display data for templates.
#[derive(Clone)]
pub struct RatingView {
    pub rate: String,
    pub count: u32,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub href: String,
    pub title: String,
    /// Title cut to 40 characters, followed by an ellipsis.
    pub short_title: String,
    pub price: String,
    pub image: String,
    pub category_label: String,
    pub rating: Option<RatingView>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            href: format!("/products/{}", product.id),
            title: product.title.clone(),
            short_title: format!("{}...", product.short_title(CARD_TITLE_CHARS)),
            price: product.price.to_string(),
            image: product.image.clone(),
            category_label: product.category.display_label(),
            rating: rating_view(product),
        }
    }
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image: String,
    pub category_label: String,
    pub description: String,
    pub rating: Option<RatingView>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            category_label: product.category.display_label(),
            description: product.description.clone(),
            rating: rating_view(product),
        }
    }
}

fn rating_view(product: &Product) -> Option<RatingView> {
    product.rating.as_ref().map(|rating| RatingView {
        rate: rating.rate.to_string(),
        count: rating.count,
    })
}

/// Category tab display data for templates.
#[derive(Clone)]
pub struct CategoryTabView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Tabs for `["all", ...categories]`, linking to `path?category=...`.
#[must_use]
pub fn category_tab_views(
    path: &str,
    categories: &[Category],
    filter: &CategoryFilter,
) -> Vec<CategoryTabView> {
    category_tabs(categories)
        .iter()
        .map(|tab| CategoryTabView {
            label: tab.display_label(),
            href: if tab.is_all() {
                path.to_string()
            } else {
                with_query(path, &[("category", tab.as_str())])
            },
            active: filter.is_selected(tab),
        })
        .collect()
}

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// Selected category; absent or `all` shows everything.
    pub category: Option<String>,
    /// `open` shows the cart modal.
    pub cart: Option<String>,
}

/// Product detail query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// `open` shows the cart modal.
    pub cart: Option<String>,
}

fn cart_is_open(cart: Option<&str>) -> bool {
    cart == Some("open")
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub nav: &'static str,
    pub tabs: Vec<CategoryTabView>,
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub notice: Option<VisibleNotice>,
}

/// Product detail page template.
///
/// `product` is `None` when the product could not be fetched.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: &'static str,
    pub product: Option<ProductDetailView>,
    pub cart: CartView,
    pub notice: Option<VisibleNotice>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let snapshot = state.catalog().load().await;
    let filter = CategoryFilter::from_selection(query.category.as_deref());

    let products = filter
        .apply(&snapshot.products)
        .into_iter()
        .map(ProductCardView::from)
        .collect();
    let tabs = category_tab_views("/products", &snapshot.categories, &filter);

    let selected = filter.category();
    let page_query: Vec<(&str, &str)> = if selected.is_all() {
        Vec::new()
    } else {
        vec![("category", selected.as_str())]
    };
    let links = CartLinks::for_page(
        "/products",
        &page_query,
        cart_is_open(query.cart.as_deref()),
    );

    let store = CartStore::load(session.clone()).await;
    let cart = CartView::listing(&store, &snapshot.products, links);
    let notice = visible_notice(&session, Utc::now()).await;

    ProductsIndexTemplate {
        nav: "products",
        tabs,
        products,
        cart,
        notice,
    }
}

/// Display product detail page.
///
/// An id that does not parse or a product the catalog cannot return renders
/// the page's own "Product not found" state with a 404 status.
#[instrument(skip(state, session, query))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Response {
    let product = match id.parse::<ProductId>() {
        Ok(product_id) => match state.catalog().product(product_id).await {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(product_id = %product_id, "Product unavailable: {e}");
                None
            }
        },
        Err(e) => {
            tracing::debug!("Invalid product id: {e}");
            None
        }
    };

    let path = format!("/products/{}", urlencoding::encode(&id));
    let links = CartLinks::for_page(&path, &[], cart_is_open(query.cart.as_deref()));

    let store = CartStore::load(session.clone()).await;
    let shown = product.as_slice();
    let cart = CartView::detail(&store, shown, links);
    let notice = visible_notice(&session, Utc::now())
        .await
        .map(|notice| match &product {
            Some(product) => notice.for_product(product),
            None => notice,
        });

    let status = if product.is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    (
        status,
        ProductShowTemplate {
            nav: "products",
            product: product.as_ref().map(ProductDetailView::from),
            cart,
            notice,
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::{Price, Rating};

    use super::*;

    fn backpack() -> Product {
        Product {
            id: ProductId::new(1),
            title: "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops".to_string(),
            price: Price::new(Decimal::new(10995, 2)).unwrap(),
            category: Category::new("men's clothing"),
            image: "https://example.com/1.jpg".to_string(),
            description: "Your perfect pack for everyday use".to_string(),
            rating: Some(Rating {
                rate: Decimal::new(39, 1),
                count: 120,
            }),
        }
    }

    #[test]
    fn test_product_card_view() {
        let card = ProductCardView::from(&backpack());

        assert_eq!(card.href, "/products/1");
        assert_eq!(card.short_title, "Fjallraven - Foldsack No. 1 Backpack, Fi...");
        assert_eq!(card.price, "$109.95");
        assert_eq!(card.category_label, "Men's clothing");
        let rating = card.rating.unwrap();
        assert_eq!(rating.rate, "3.9");
        assert_eq!(rating.count, 120);
    }

    #[test]
    fn test_category_tab_views() {
        let categories = vec![Category::new("electronics"), Category::new("men's clothing")];
        let filter = CategoryFilter::from_selection(Some("electronics"));

        let tabs = category_tab_views("/products", &categories, &filter);

        let labels: Vec<_> = tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["All", "Electronics", "Men's clothing"]);
        assert_eq!(tabs[0].href, "/products");
        assert_eq!(tabs[1].href, "/products?category=electronics");
        assert_eq!(tabs[2].href, "/products?category=men%27s%20clothing");
        let active: Vec<_> = tabs.iter().map(|t| t.active).collect();
        assert_eq!(active, [false, true, false]);
    }

    #[test]
    fn test_all_tab_active_without_selection() {
        let tabs = category_tab_views("/", &[Category::new("jewelery")], &CategoryFilter::All);
        assert!(tabs[0].active);
        assert!(!tabs[1].active);
    }

    #[test]
    fn test_cart_is_open() {
        assert!(cart_is_open(Some("open")));
        assert!(!cart_is_open(Some("closed")));
        assert!(!cart_is_open(None));
    }

    #[tokio::test]
    async fn test_notice_banner_dismisses_itself() {
        let store = CartStore::load(crate::cart_store::MemoryStorage::new()).await;
        let html = ProductsIndexTemplate {
            nav: "products",
            tabs: Vec::new(),
            products: Vec::new(),
            cart: CartView::listing(&store, &[], CartLinks::for_page("/products", &[], false)),
            notice: Some(VisibleNotice {
                text: "Added to cart!".to_string(),
                product_id: Some(ProductId::new(1)),
                remaining_ms: 1500,
            }),
        }
        .render()
        .unwrap();

        assert!(html.contains("style=\"animation-delay: 1500ms\">Added to cart!</div>"));
        assert!(html.contains("@keyframes notice-dismiss"));
    }
}
