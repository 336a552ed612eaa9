//! Session middleware configuration.
//!
//! The session is the visitor's local key-value storage: it holds the saved
//! cart and pending notices, identified by a cookie. Sessions are kept in
//! `SQLite`, so carts survive restarts.

use std::time::Duration;

use tokio::task::JoinHandle;
use tower_sessions::{Expiry, SessionManagerLayer, session_store::ExpiredDeletion};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopfront_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// How often expired sessions are deleted from the store.
pub const EXPIRED_SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Create the session layer over the `SQLite` store.
///
/// The sessions table must already exist (see `SqliteStore::migrate`).
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Spawn the background task that deletes expired sessions every `period`.
///
/// The task runs until aborted or until the store reports an error, which
/// is logged.
pub fn spawn_expired_session_sweep(store: SqliteStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = store.continuously_delete_expired(period).await {
            tracing::error!("Expired session sweep stopped: {e}");
        }
    })
}
