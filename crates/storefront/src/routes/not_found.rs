//! Fallback handler for unknown routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};

use crate::filters;

/// Route-level not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub nav: &'static str,
}

/// Render the 404 page.
pub async fn show() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate { nav: "" })
}
