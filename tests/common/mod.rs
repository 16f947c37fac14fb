#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use papertrade::adapters::sqlite_store::SqliteStore;
use papertrade::adapters::web::{build_router, AppState};
use papertrade::domain::error::PapertradeError;
use papertrade::ports::config_port::ConfigPort;
use papertrade::ports::quote_port::{Quote, QuotePort};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// In-memory quote provider with prices adjustable mid-test through a
/// cloned handle.
#[derive(Clone, Default)]
pub struct MockQuotePort {
    quotes: Arc<Mutex<HashMap<String, Quote>>>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(self, symbol: &str, name: &str, price: f64) -> Self {
        self.quotes.lock().unwrap().insert(
            symbol.to_string(),
            Quote {
                symbol: symbol.to_string(),
                name: name.to_string(),
                price,
            },
        );
        self
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        if let Some(quote) = self.quotes.lock().unwrap().get_mut(symbol) {
            quote.price = price;
        }
    }

    pub fn remove(&self, symbol: &str) {
        self.quotes.lock().unwrap().remove(symbol);
    }
}

#[async_trait]
impl QuotePort for MockQuotePort {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PapertradeError> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .get(&symbol.trim().to_uppercase())
            .cloned())
    }
}

/// Quote provider that always fails at the transport level.
pub struct FailingQuotePort;

#[async_trait]
impl QuotePort for FailingQuotePort {
    async fn lookup(&self, _symbol: &str) -> Result<Option<Quote>, PapertradeError> {
        Err(PapertradeError::QuoteProvider {
            reason: "connection refused".into(),
        })
    }
}

pub struct TestConfig;

impl ConfigPort for TestConfig {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            // 64 zero bytes, hex encoded.
            ("web", "session_secret") => Some("00".repeat(64)),
            ("database", "path") => Some(":memory:".to_string()),
            _ => None,
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match (section, key) {
            ("web", "session_lifetime") => 86_400,
            _ => default,
        }
    }

    fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
        default
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

pub fn default_quotes() -> MockQuotePort {
    MockQuotePort::new()
        .with_quote("AAPL", "Apple Inc", 20.0)
        .with_quote("NFLX", "Netflix Inc", 50.0)
}

pub fn build_app(quotes: impl QuotePort + Send + Sync + 'static) -> Router {
    let store = SqliteStore::in_memory().unwrap();
    store.initialize_schema().unwrap();

    let state = AppState {
        store: Arc::new(store),
        quotes: Arc::new(quotes),
        config: Arc::new(TestConfig),
    };
    build_router(state).unwrap()
}

pub fn test_app() -> Router {
    build_app(default_quotes())
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request_with_cookies(uri: &str, body: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookies)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookies)
        .body(Body::empty())
        .unwrap()
}

pub fn extract_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

pub fn build_cookie_header(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .map(|sc| sc.split(';').next().unwrap_or("").to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Register a user and return the session cookie header for follow-up
/// requests.
pub async fn register_user(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password1={password}&password2={password}");
    let response = app
        .clone()
        .oneshot(form_request("/register", &body))
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        axum::http::StatusCode::SEE_OTHER,
        "registration should redirect"
    );
    let cookies = extract_cookies(&response);
    assert!(!cookies.is_empty(), "registration should set a session cookie");
    build_cookie_header(&cookies)
}
