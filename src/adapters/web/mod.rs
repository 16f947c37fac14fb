//! Web server adapter.
//!
//! Axum server with askama-rendered pages: portfolio, buy/sell/quote forms,
//! transaction history, and session-based authentication.

mod auth;
mod error;
mod flash;
mod handlers;
mod templates;

pub use auth::{hash_password, AuthSession, Backend, Credentials, SessionUser};
pub use error::Apology;
pub use handlers::*;
pub use templates::*;

use axum::{routing::get, Router};
use axum_login::{login_required, AuthManagerLayerBuilder};
use std::sync::Arc;
use time::Duration;
use tower_http::services::ServeDir;
use tower_sessions::{cookie::Key, Expiry, MemoryStore, SessionManagerLayer};

use crate::domain::error::PapertradeError;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::store_port::StorePort;

pub struct AppState {
    pub store: Arc<dyn StorePort + Send + Sync>,
    pub quotes: Arc<dyn QuotePort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

/// Build the application router with session and auth layers.
///
/// Sessions live in memory and are signed with the `[web] session_secret`
/// key (hex, at least 64 bytes decoded). Every route above the
/// `login_required` layer redirects unauthenticated requests to `/login`.
pub fn build_router(state: AppState) -> Result<Router, PapertradeError> {
    let secret = state.config.get_string("web", "session_secret").ok_or_else(|| {
        PapertradeError::ConfigMissing {
            section: "web".into(),
            key: "session_secret".into(),
        }
    })?;
    let secret = hex::decode(&secret).map_err(|_| PapertradeError::ConfigInvalid {
        section: "web".into(),
        key: "session_secret".into(),
        reason: "must be a hex string".into(),
    })?;
    let key = Key::try_from(&secret[..]).map_err(|_| PapertradeError::ConfigInvalid {
        section: "web".into(),
        key: "session_secret".into(),
        reason: "must decode to at least 64 bytes".into(),
    })?;

    let lifetime = state.config.get_int("web", "session_lifetime", 86_400);

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_signed(key)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(lifetime)));

    let backend = Backend::new(state.store.clone());
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let state = Arc::new(state);

    Ok(Router::new()
        .route("/", get(handlers::index))
        .route("/buy", get(handlers::buy_form).post(handlers::buy))
        .route("/sell", get(handlers::sell_form).post(handlers::sell))
        .route("/quote", get(handlers::quote_form).post(handlers::quote))
        .route("/history", get(handlers::history))
        .route_layer(login_required!(Backend, login_url = "/login"))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/logout", get(handlers::logout))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .layer(auth_layer)
        .with_state(state))
}
