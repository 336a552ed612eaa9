//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use shopfront_core::{CategoryFilter, ROTATION_INTERVAL, TESTIMONIALS, Testimonial};

use crate::filters;
use crate::routes::products::{CategoryTabView, ProductCardView, category_tab_views};
use crate::state::AppState;

/// Number of products in the "Featured Products" section.
const FEATURED_COUNT: usize = 4;

/// Home page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
}

/// Testimonial display data for templates.
#[derive(Clone)]
pub struct TestimonialView {
    pub text: &'static str,
    pub author: &'static str,
    /// Shown when the page loads; the others start hidden.
    pub active: bool,
}

/// Every testimonial, with the one at `position` shown first.
#[must_use]
pub fn testimonial_views(position: usize) -> Vec<TestimonialView> {
    let current = Testimonial::at(position);
    TESTIMONIALS
        .iter()
        .map(|t| TestimonialView {
            text: t.text,
            author: t.author,
            active: *t == current,
        })
        .collect()
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: &'static str,
    pub tabs: Vec<CategoryTabView>,
    pub featured_products: Vec<ProductCardView>,
    /// Nothing could be loaded from the catalog.
    pub catalog_unavailable: bool,
    pub testimonials: Vec<TestimonialView>,
    /// Rotation period; the page script advances one testimonial per period
    /// and stops when the page is hidden.
    pub rotate_ms: u128,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let snapshot = state.catalog().load().await;
    let filter = CategoryFilter::from_selection(query.category.as_deref());

    let featured_products = filter
        .apply(&snapshot.products)
        .into_iter()
        .take(FEATURED_COUNT)
        .map(ProductCardView::from)
        .collect();

    HomeTemplate {
        nav: "home",
        tabs: category_tab_views("/", &snapshot.categories, &filter),
        featured_products,
        catalog_unavailable: snapshot.products.is_empty() && snapshot.categories.is_empty(),
        testimonials: testimonial_views(state.testimonials().current()),
        rotate_ms: ROTATION_INTERVAL.as_millis(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(position: usize) -> String {
        HomeTemplate {
            nav: "home",
            tabs: Vec::new(),
            featured_products: Vec::new(),
            catalog_unavailable: true,
            testimonials: testimonial_views(position),
            rotate_ms: ROTATION_INTERVAL.as_millis(),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_testimonial_views_mark_one_active() {
        let views = testimonial_views(4);
        let active: Vec<_> = views.iter().map(|v| v.active).collect();
        assert_eq!(active, [false, true, false]);
    }

    #[test]
    fn test_home_page_rotates_testimonials_in_the_browser() {
        let html = render(0);

        assert!(html.contains("data-rotate-ms=\"5000\""));
        assert!(html.contains("setInterval("));
        assert!(html.contains("section.dataset.rotateMs"));
        assert!(html.contains("clearInterval(timer)"));
        for testimonial in TESTIMONIALS {
            assert!(html.contains(testimonial.author));
        }
        assert_eq!(html.matches("class=\"testimonial\" hidden").count(), 2);
        assert_eq!(html.matches("class=\"testimonial\">").count(), 1);
    }
}
