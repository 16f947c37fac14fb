//! HTTP quote provider adapter for IEX-style endpoints.

use crate::domain::error::PapertradeError;
use crate::domain::trading::normalize_symbol;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::{Quote, QuotePort};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct IexQuoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IexQuoteClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, PapertradeError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PapertradeError::QuoteProvider {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(
        config: &dyn ConfigPort,
        api_key: String,
    ) -> Result<Self, PapertradeError> {
        let base_url = config
            .get_string("quote", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, base_url)
    }
}

/// Wire format of the provider's quote endpoint.
#[derive(Debug, Deserialize)]
struct IexQuoteBody {
    symbol: String,
    #[serde(rename = "companyName")]
    company_name: String,
    #[serde(rename = "latestPrice")]
    latest_price: f64,
}

impl From<IexQuoteBody> for Quote {
    fn from(body: IexQuoteBody) -> Self {
        Quote {
            symbol: body.symbol,
            name: body.company_name,
            price: body.latest_price,
        }
    }
}

/// Tickers are uppercase alphanumerics plus `.` and `-`; anything else is
/// never forwarded to the provider.
fn valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

#[async_trait::async_trait]
impl QuotePort for IexQuoteClient {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, PapertradeError> {
        let symbol = normalize_symbol(symbol);
        if !valid_symbol(&symbol) {
            return Ok(None);
        }

        let url = format!("{}/stable/stock/{}/quote", self.base_url, symbol);
        let response = self
            .http
            .get(&url)
            .query(&[("token", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PapertradeError::QuoteProvider {
                reason: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(PapertradeError::QuoteProvider {
                reason: format!("unexpected HTTP {} from quote provider", response.status()),
            });
        }

        let body: IexQuoteBody =
            response
                .json()
                .await
                .map_err(|e| PapertradeError::QuoteProvider {
                    reason: e.to_string(),
                })?;

        Ok(Some(body.into()))
    }
}
