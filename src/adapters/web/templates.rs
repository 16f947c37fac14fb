//! HTML page templates using Askama.
//!
//! Money and share counts are preformatted into strings by the handlers so
//! the templates stay display-only.

use askama::Template;
use askama_web::WebTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flash: Option<String>,
    pub positions: Vec<PositionRow>,
    pub cash: String,
    pub patrimony: String,
}

pub struct PositionRow {
    pub symbol: String,
    pub name: String,
    pub quantity: String,
    pub price: String,
    pub value: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "buy.html")]
pub struct BuyTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "sell.html")]
pub struct SellTemplate {
    pub symbols: Vec<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "quote.html")]
pub struct QuoteTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "quoted.html")]
pub struct QuotedTemplate {
    pub name: String,
    pub symbol: String,
    pub price: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "history.html")]
pub struct HistoryTemplate {
    pub flash: Option<String>,
    pub rows: Vec<HistoryRow>,
}

pub struct HistoryRow {
    pub symbol: String,
    pub quantity: String,
    pub price: String,
    pub executed_at: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
pub struct RegisterTemplate;

#[derive(Template)]
#[template(path = "apology.html")]
pub struct ApologyTemplate {
    pub message: String,
    pub status: u16,
}
