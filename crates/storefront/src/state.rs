//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;
use tower_sessions_sqlx_store::SqliteStore;

use shopfront_core::{ROTATION_INTERVAL, TESTIMONIALS};

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::db;
use crate::rotation::Rotation;

/// Errors that can occur while building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Session database error: {0}")]
    SessionDatabase(#[from] sqlx::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    sessions: SqliteStore,
    testimonials: Rotation,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Opens the session database and creates the sessions table if needed,
    /// then starts the server-side testimonial rotation. The rotation only
    /// picks which testimonial a freshly rendered home page starts on; the
    /// page cycles through the rest in the browser. It runs until the last
    /// clone of the state is dropped. Must be called from within a Tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built or the
    /// session database cannot be opened or migrated.
    pub async fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog = CatalogClient::new(&config.catalog)?;

        let pool = db::create_pool(&config.session_database_url).await?;
        let sessions = SqliteStore::new(pool);
        sessions.migrate().await?;

        let testimonials = Rotation::start(ROTATION_INTERVAL, TESTIMONIALS.len());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions,
                testimonials,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SqliteStore {
        &self.inner.sessions
    }

    /// Get a reference to the testimonial rotation that picks the home
    /// page's opening testimonial.
    #[must_use]
    pub fn testimonials(&self) -> &Rotation {
        &self.inner.testimonials
    }
}
