//! Session-related types.
//!
//! Types stored in the visitor's session next to the saved cart.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use shopfront_core::{Product, ProductId, truncate_chars};

/// How long a confirmation notice stays visible, in seconds.
pub const NOTICE_LIFETIME_SECS: i64 = 2;

/// Characters of a product title kept in an "added to cart" notice.
const NOTICE_TITLE_CHARS: usize = 20;

/// A transient confirmation message, e.g. "Added to cart!".
///
/// Notices clear themselves: the rendered banner hides once `expires_at`
/// passes, and pages rendered after that drop it from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub text: String,
    /// Product the notice is about, if any.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    /// A notice shown from `now` for [`NOTICE_LIFETIME_SECS`].
    #[must_use]
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            product_id: None,
            expires_at: now + TimeDelta::seconds(NOTICE_LIFETIME_SECS),
        }
    }

    /// Confirmation for one unit of `product_id` added to the cart.
    #[must_use]
    pub fn added_to_cart(product_id: ProductId, now: DateTime<Utc>) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::new("Added to cart!", now)
        }
    }

    #[must_use]
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// A notice as rendered: its text and how long the banner stays up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNotice {
    pub text: String,
    pub product_id: Option<ProductId>,
    /// Milliseconds until the banner hides itself.
    pub remaining_ms: i64,
}

impl VisibleNotice {
    fn from_notice(notice: Notice, now: DateTime<Utc>) -> Self {
        Self {
            remaining_ms: (notice.expires_at - now).num_milliseconds().max(0),
            text: notice.text,
            product_id: notice.product_id,
        }
    }

    /// On `product`'s own page, name the product: "<title>... added to cart!".
    ///
    /// The title comes from the catalog, never from the request.
    #[must_use]
    pub fn for_product(self, product: &Product) -> Self {
        if self.product_id == Some(product.id) {
            Self {
                text: format!(
                    "{}... added to cart!",
                    truncate_chars(&product.title, NOTICE_TITLE_CHARS)
                ),
                ..self
            }
        } else {
            self
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for the pending confirmation notice.
    pub const NOTICE: &str = "notice";
}

/// Store `notice`, replacing any pending one.
pub async fn set_notice(session: &Session, notice: &Notice) {
    if let Err(e) = session.insert(keys::NOTICE, notice).await {
        tracing::error!("Failed to save notice to session: {e}");
    }
}

/// The pending notice if it is still visible at `now`.
///
/// Expired notices are removed from the session. Read failures are logged
/// and treated as no notice.
pub async fn visible_notice(session: &Session, now: DateTime<Utc>) -> Option<VisibleNotice> {
    let notice = match session.get::<Notice>(keys::NOTICE).await {
        Ok(notice) => notice?,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read notice from session");
            return None;
        }
    };

    if notice.is_visible(now) {
        return Some(VisibleNotice::from_notice(notice, now));
    }

    if let Err(e) = session.remove::<Notice>(keys::NOTICE).await {
        tracing::warn!("Failed to clear expired notice: {e}");
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use shopfront_core::{Category, Price};
    use tower_sessions::MemoryStore;

    use super::*;

    fn product(id: i32, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::new(Decimal::new(6400, 2)).unwrap(),
            category: Category::new("electronics"),
            image: String::new(),
            description: String::new(),
            rating: None,
        }
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_notice_expires_after_two_seconds() {
        let now = Utc::now();
        let notice = Notice::new("Added to cart!", now);

        assert!(notice.is_visible(now));
        assert!(notice.is_visible(now + TimeDelta::milliseconds(1999)));
        assert!(!notice.is_visible(now + TimeDelta::seconds(2)));
        assert!(!notice.is_visible(now + TimeDelta::seconds(30)));
    }

    #[test]
    fn test_detail_notice_uses_catalog_title() {
        let now = Utc::now();
        let drive = product(9, "WD 2TB Elements Portable External Hard Drive - USB 3.0");
        let visible =
            VisibleNotice::from_notice(Notice::added_to_cart(drive.id, now), now).for_product(&drive);

        assert_eq!(visible.text, "WD 2TB Elements Port... added to cart!");
        assert_eq!(visible.remaining_ms, 2000);
    }

    #[test]
    fn test_notice_for_other_product_keeps_generic_text() {
        let now = Utc::now();
        let visible = VisibleNotice::from_notice(Notice::added_to_cart(ProductId::new(5), now), now)
            .for_product(&product(9, "WD 2TB Elements Portable External Hard Drive"));

        assert_eq!(visible.text, "Added to cart!");
    }

    #[tokio::test]
    async fn test_visible_notice_counts_down_and_clears() {
        let session = session();
        let now = Utc::now();
        set_notice(&session, &Notice::added_to_cart(ProductId::new(9), now)).await;

        let visible = visible_notice(&session, now + TimeDelta::milliseconds(500))
            .await
            .unwrap();
        assert_eq!(visible.remaining_ms, 1500);
        assert_eq!(visible.product_id, Some(ProductId::new(9)));

        assert!(
            visible_notice(&session, now + TimeDelta::seconds(3))
                .await
                .is_none()
        );
        assert!(
            session
                .get::<Notice>(keys::NOTICE)
                .await
                .unwrap()
                .is_none()
        );
    }
}
