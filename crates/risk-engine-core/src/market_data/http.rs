//! Client for the stock price service
//!
//! `GET /api/stock-price?symbols=A,B` answers with one object per symbol,
//! either a quote or `{"error": "..."}`. `GET /api/stock-forecast?symbol=A`
//! answers with `forecast_prices`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::PriceSource;
use crate::error::RiskEngineError;
use crate::portfolio_risk::position::PriceQuote;
use crate::types::Money;
use crate::RiskEngineResult;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct HttpPriceSource {
    config: HttpSourceConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecast_prices: Option<Vec<Money>>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpPriceSource {
    pub fn new() -> RiskEngineResult<Self> {
        Self::with_config(HttpSourceConfig::default())
    }

    pub fn with_config(mut config: HttpSourceConfig) -> RiskEngineResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> RiskEngineResult<T> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(url = %url, "Requesting price service");

        let response = self.client.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RiskEngineError::DataSource(format!(
                "price service error: {status} - {body}"
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn quotes(&self, symbols: &[String]) -> RiskEngineResult<HashMap<String, PriceQuote>> {
        let joined = symbols.join(",");
        let raw: HashMap<String, serde_json::Value> = self
            .get_json("/api/stock-price", &[("symbols", joined.as_str())])
            .await?;

        let mut quotes = HashMap::with_capacity(raw.len());
        for (symbol, value) in raw {
            if let Some(err) = value.get("error") {
                tracing::warn!(symbol = %symbol, error = %err, "Price service could not quote symbol");
                continue;
            }
            match serde_json::from_value::<PriceQuote>(value) {
                Ok(quote) => {
                    quotes.insert(symbol, quote);
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Malformed quote skipped");
                }
            }
        }

        tracing::debug!(
            requested = symbols.len(),
            quoted = quotes.len(),
            "Received quotes"
        );
        Ok(quotes)
    }

    async fn forecast(&self, symbol: &str) -> RiskEngineResult<Vec<Money>> {
        let response: ForecastResponse = self
            .get_json("/api/stock-forecast", &[("symbol", symbol)])
            .await?;
        if let Some(err) = response.error {
            return Err(RiskEngineError::DataSource(format!(
                "forecast for {symbol}: {err}"
            )));
        }
        response
            .forecast_prices
            .ok_or_else(|| RiskEngineError::DataSource(format!("no forecast for {symbol}")))
    }
}
