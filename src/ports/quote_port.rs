//! External quote provider port trait.

use crate::domain::error::PapertradeError;

/// A resolved ticker quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
}

/// Resolves a ticker symbol to a name and current price.
///
/// `Ok(None)` means the provider does not recognize the symbol; transport
/// and decoding failures surface as `QuoteProvider` errors.
#[async_trait::async_trait]
pub trait QuotePort {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PapertradeError>;
}
