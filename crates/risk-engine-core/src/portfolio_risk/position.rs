use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

pub const HISTORY_DAYS: usize = 5;
pub const FORECAST_DAYS: usize = 7;

const COMPANY_NAMES: [(&str, &str); 5] = [
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("TSLA", "Tesla Inc."),
    ("AMZN", "Amazon.com Inc."),
];

/// Quote as returned by the price service. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub current: Option<Money>,
    #[serde(default)]
    pub previous_close: Option<Money>,
    #[serde(default)]
    pub open: Option<Money>,
    #[serde(default)]
    pub low: Option<Money>,
    #[serde(default)]
    pub high: Option<Money>,
    /// Closing prices, oldest first
    #[serde(default)]
    pub historical_prices: Vec<Money>,
}

impl PriceQuote {
    /// The current price, when present and nonzero.
    pub fn usable_price(&self) -> Option<Money> {
        self.current.filter(|c| !c.is_zero())
    }
}

/// How much of a position's market data was actually available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    Complete,
    /// Priced, but the forecast was projected locally
    ForecastFallback,
    /// No usable quote; every price field is zero
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub name: String,
    pub quantity: u64,
    pub current_price: Money,
    pub previous_close: Money,
    /// (current - previous close) / previous close
    pub daily_return: Rate,
    /// Five closes, oldest first
    pub historical_prices: Vec<Money>,
    /// Seven projected closes, day +1 first
    pub forecast_prices: Vec<Money>,
    pub status: DataStatus,
}

impl PortfolioPosition {
    /// All-zero position for a symbol with no usable quote.
    pub fn unavailable(symbol: &str, quantity: u64) -> Self {
        PortfolioPosition {
            symbol: symbol.to_string(),
            name: company_name(symbol).to_string(),
            quantity,
            current_price: Decimal::ZERO,
            previous_close: Decimal::ZERO,
            daily_return: Decimal::ZERO,
            historical_prices: vec![Decimal::ZERO; HISTORY_DAYS],
            forecast_prices: vec![Decimal::ZERO; FORECAST_DAYS],
            status: DataStatus::Unavailable,
        }
    }

    pub fn market_value(&self) -> Money {
        self.current_price * Decimal::from(self.quantity)
    }

    /// Market value, or `None` when price x quantity leaves the decimal range.
    pub fn checked_market_value(&self) -> Option<Money> {
        self.current_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Display name for the well-known tickers, else the symbol itself.
pub fn company_name(symbol: &str) -> &str {
    COMPANY_NAMES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, name)| *name)
        .unwrap_or(symbol)
}

/// Project `FORECAST_DAYS` prices by compounding the growth between the
/// two most recent prices. Flat when fewer than two prices are known, the
/// earlier one is zero, or compounding leaves the decimal range.
pub fn fallback_forecast(history: &[Money]) -> Vec<Money> {
    let Some(&last) = history.last() else {
        return vec![Decimal::ZERO; FORECAST_DAYS];
    };
    let growth = match history.len() {
        0 | 1 => Decimal::ONE,
        n => {
            let previous = history[n - 2];
            if previous.is_zero() {
                Decimal::ONE
            } else {
                last.checked_div(previous).unwrap_or(Decimal::ONE)
            }
        }
    };

    let mut prices = Vec::with_capacity(FORECAST_DAYS);
    for day in 1..=FORECAST_DAYS as i64 {
        match growth.checked_powi(day).and_then(|g| last.checked_mul(g)) {
            Some(price) => prices.push(price),
            None => return vec![last; FORECAST_DAYS],
        }
    }
    prices
}

fn nonzero_or(value: Option<Money>, fallback: Money) -> Money {
    match value {
        Some(v) if !v.is_zero() => v,
        _ => fallback,
    }
}

/// Turn a service quote (and optional service forecast) into a position.
///
/// Missing or zero-priced quotes degrade to an all-zero position instead of
/// failing, so one bad symbol never aborts the portfolio.
pub fn build_position(
    symbol: &str,
    quantity: u64,
    quote: Option<&PriceQuote>,
    forecast: Option<Vec<Money>>,
) -> PortfolioPosition {
    let Some((quote, current)) = quote.and_then(|q| q.usable_price().map(|c| (q, c))) else {
        return PortfolioPosition::unavailable(symbol, quantity);
    };

    let previous_close = quote.previous_close.unwrap_or(Decimal::ZERO);
    let daily_return = if previous_close.is_zero() {
        Decimal::ZERO
    } else {
        (current - previous_close)
            .checked_div(previous_close)
            .unwrap_or(Decimal::ZERO)
    };

    let historical_prices = if quote.historical_prices.len() >= HISTORY_DAYS {
        quote.historical_prices[quote.historical_prices.len() - HISTORY_DAYS..].to_vec()
    } else {
        vec![
            nonzero_or(quote.previous_close, current),
            nonzero_or(quote.open, current),
            nonzero_or(quote.low, current),
            nonzero_or(quote.high, current),
            current,
        ]
    };

    let (forecast_prices, status) = match forecast {
        Some(prices) if !prices.is_empty() => (prices, DataStatus::Complete),
        _ => (
            fallback_forecast(&historical_prices),
            DataStatus::ForecastFallback,
        ),
    };

    PortfolioPosition {
        symbol: symbol.to_string(),
        name: company_name(symbol).to_string(),
        quantity,
        current_price: current,
        previous_close,
        daily_return,
        historical_prices,
        forecast_prices,
        status,
    }
}
