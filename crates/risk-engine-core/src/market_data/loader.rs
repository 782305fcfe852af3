use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::PriceSource;
use crate::error::RiskEngineError;
use crate::portfolio_risk::position::{build_position, DataStatus, PortfolioPosition};
use crate::types::Money;
use crate::RiskEngineResult;

/// A symbol and how many shares of it are held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u64,
}

/// Pair up parallel symbol and quantity lists into normalised holdings.
pub fn holdings_from_lists(symbols: &[String], quantities: &[u64]) -> RiskEngineResult<Vec<Holding>> {
    if symbols.len() != quantities.len() {
        return Err(RiskEngineError::InvalidInput {
            field: "quantities".into(),
            reason: format!(
                "{} symbols but {} quantities",
                symbols.len(),
                quantities.len()
            ),
        });
    }
    let holdings: Vec<Holding> = symbols
        .iter()
        .zip(quantities)
        .map(|(symbol, &quantity)| Holding {
            symbol: symbol.clone(),
            quantity,
        })
        .collect();
    normalise_holdings(&holdings)
}

/// Trim and upper-case every symbol, then validate the result.
pub fn normalise_holdings(holdings: &[Holding]) -> RiskEngineResult<Vec<Holding>> {
    let normalised: Vec<Holding> = holdings
        .iter()
        .map(|h| Holding {
            symbol: h.symbol.trim().to_uppercase(),
            quantity: h.quantity,
        })
        .collect();
    validate_holdings(&normalised)?;
    Ok(normalised)
}

pub fn validate_holdings(holdings: &[Holding]) -> RiskEngineResult<()> {
    if holdings.is_empty() {
        return Err(RiskEngineError::InsufficientData(
            "At least one holding is required".into(),
        ));
    }
    for h in holdings {
        if h.symbol.trim().is_empty() {
            return Err(RiskEngineError::InvalidInput {
                field: "symbol".into(),
                reason: "Symbol must not be blank".into(),
            });
        }
        if h.quantity == 0 {
            return Err(RiskEngineError::InvalidInput {
                field: "quantity".into(),
                reason: format!("{}: quantity must be positive", h.symbol),
            });
        }
    }
    Ok(())
}

/// Price every holding. One quote request covers all symbols; forecasts
/// for the priced symbols are then fetched concurrently.
///
/// Symbols are normalised first. Data failures never fail the call: a
/// missing quote yields an `Unavailable` position and a missing forecast a
/// locally projected one. Only invalid holdings are an error.
pub async fn load_positions<S>(
    source: &S,
    holdings: &[Holding],
    timeout: Duration,
) -> RiskEngineResult<Vec<PortfolioPosition>>
where
    S: PriceSource + ?Sized,
{
    let holdings = normalise_holdings(holdings)?;

    let mut symbols: Vec<String> = Vec::with_capacity(holdings.len());
    for h in &holdings {
        if !symbols.contains(&h.symbol) {
            symbols.push(h.symbol.clone());
        }
    }

    let quotes = match tokio::time::timeout(timeout, source.quotes(&symbols)).await {
        Ok(Ok(quotes)) => quotes,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Quote request failed, all positions unpriced");
            HashMap::new()
        }
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "Quote request timed out, all positions unpriced"
            );
            HashMap::new()
        }
    };

    let priced: Vec<&str> = symbols
        .iter()
        .filter(|s| quotes.get(*s).and_then(|q| q.usable_price()).is_some())
        .map(String::as_str)
        .collect();

    let fetched = join_all(priced.iter().map(|s| fetch_forecast(source, s, timeout))).await;
    let forecasts: HashMap<&str, Vec<Money>> = priced
        .into_iter()
        .zip(fetched)
        .filter_map(|(s, f)| f.map(|prices| (s, prices)))
        .collect();

    let positions: Vec<PortfolioPosition> = holdings
        .iter()
        .map(|h| {
            build_position(
                &h.symbol,
                h.quantity,
                quotes.get(&h.symbol),
                forecasts.get(h.symbol.as_str()).cloned(),
            )
        })
        .collect();

    for p in &positions {
        match p.status {
            DataStatus::Unavailable => {
                tracing::warn!(symbol = %p.symbol, "No usable quote, position valued at zero")
            }
            DataStatus::ForecastFallback => {
                tracing::debug!(symbol = %p.symbol, "Using projected forecast")
            }
            DataStatus::Complete => {}
        }
    }

    tracing::info!(
        positions = positions.len(),
        forecasts = forecasts.len(),
        "Positions loaded"
    );
    Ok(positions)
}

async fn fetch_forecast<S>(source: &S, symbol: &str, timeout: Duration) -> Option<Vec<Money>>
where
    S: PriceSource + ?Sized,
{
    match tokio::time::timeout(timeout, source.forecast(symbol)).await {
        Ok(Ok(prices)) if !prices.is_empty() => Some(prices),
        Ok(Ok(_)) => {
            tracing::warn!(symbol = %symbol, "Empty forecast returned");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!(symbol = %symbol, error = %e, "Forecast request failed");
            None
        }
        Err(_) => {
            tracing::warn!(symbol = %symbol, "Forecast request timed out");
            None
        }
    }
}
