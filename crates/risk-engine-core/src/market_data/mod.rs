//! Market data access
//!
//! Fetches quotes and forecasts for a set of holdings and turns them into
//! priced positions for the portfolio aggregator.

mod http;
mod loader;

pub use http::{HttpPriceSource, HttpSourceConfig, DEFAULT_BASE_URL};
pub use loader::{
    holdings_from_lists, load_positions, normalise_holdings, validate_holdings, Holding,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RiskEngineError;
use crate::portfolio_risk::position::PriceQuote;
use crate::types::Money;
use crate::RiskEngineResult;

/// Anything that can quote prices and project them forward.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Quotes for the requested symbols. Symbols the source cannot price
    /// are simply absent from the map.
    async fn quotes(&self, symbols: &[String]) -> RiskEngineResult<HashMap<String, PriceQuote>>;

    /// Projected closes for one symbol, day +1 first.
    async fn forecast(&self, symbol: &str) -> RiskEngineResult<Vec<Money>>;
}

/// In-memory source, also the shape of a `--prices` JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPriceSource {
    #[serde(default)]
    pub quotes: HashMap<String, PriceQuote>,
    #[serde(default)]
    pub forecasts: HashMap<String, Vec<Money>>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, symbol: &str, quote: PriceQuote) -> Self {
        self.quotes.insert(symbol.to_string(), quote);
        self
    }

    pub fn with_forecast(mut self, symbol: &str, prices: Vec<Money>) -> Self {
        self.forecasts.insert(symbol.to_string(), prices);
        self
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn quotes(&self, symbols: &[String]) -> RiskEngineResult<HashMap<String, PriceQuote>> {
        Ok(symbols
            .iter()
            .filter_map(|s| self.quotes.get(s).map(|q| (s.clone(), q.clone())))
            .collect())
    }

    async fn forecast(&self, symbol: &str) -> RiskEngineResult<Vec<Money>> {
        self.forecasts
            .get(symbol)
            .cloned()
            .ok_or_else(|| RiskEngineError::DataSource(format!("no forecast for {symbol}")))
    }
}
