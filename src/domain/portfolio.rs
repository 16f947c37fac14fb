//! Account, holdings, and patrimony types.

use chrono::NaiveDateTime;

/// Cash credited to every new account.
pub const STARTING_CASH: f64 = 10_000.0;

/// Net positions at or below this threshold are treated as closed; keeps
/// floating-point dust out of the portfolio view.
pub const HOLDING_EPSILON: f64 = 0.01;

/// A stored user row.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Argon2id hash in PHC string format.
    pub hash: String,
    pub cash: f64,
}

/// A user's net position in one symbol, derived by summing signed
/// transaction quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
}

/// One row of the append-only transaction ledger. Quantity and price are
/// both signed: positive for buys, negative for sells.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub executed_at: NaiveDateTime,
}

impl TransactionRecord {
    /// Per-share price for display. Quantity and total price carry the same
    /// sign, so the result is positive for buys and sells alike.
    pub fn price_per_share(&self) -> f64 {
        self.price / self.quantity
    }
}

/// A holding enriched with a live quote.
#[derive(Debug, Clone)]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub price: f64,
    pub value: f64,
}

/// Cash plus the current market value of all positions.
pub fn patrimony(cash: f64, positions: &[Position]) -> f64 {
    cash + positions.iter().map(|p| p.value).sum::<f64>()
}
