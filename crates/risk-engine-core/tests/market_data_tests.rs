#![cfg(feature = "market_data")]

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use risk_engine_core::market_data::{load_positions, Holding, PriceSource, StaticPriceSource};
use risk_engine_core::portfolio_risk::aggregator::{calculate_portfolio_risk, PortfolioRiskInput};
use risk_engine_core::portfolio_risk::position::{DataStatus, PriceQuote};
use risk_engine_core::{Money, RiskEngineError, RiskEngineResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(200);

fn holding(symbol: &str, quantity: u64) -> Holding {
    Holding {
        symbol: symbol.to_string(),
        quantity,
    }
}

fn quote(current: Decimal, previous: Decimal) -> PriceQuote {
    PriceQuote {
        current: Some(current),
        previous_close: Some(previous),
        historical_prices: vec![dec!(96), dec!(97), dec!(98), previous, current],
        ..Default::default()
    }
}

struct FailingSource;

#[async_trait]
impl PriceSource for FailingSource {
    async fn quotes(&self, _symbols: &[String]) -> RiskEngineResult<HashMap<String, PriceQuote>> {
        Err(RiskEngineError::DataSource("connection refused".into()))
    }

    async fn forecast(&self, _symbol: &str) -> RiskEngineResult<Vec<Money>> {
        Err(RiskEngineError::DataSource("connection refused".into()))
    }
}

/// Quotes immediately, but never answers forecasts in time.
struct SlowForecastSource(StaticPriceSource);

#[async_trait]
impl PriceSource for SlowForecastSource {
    async fn quotes(&self, symbols: &[String]) -> RiskEngineResult<HashMap<String, PriceQuote>> {
        self.0.quotes(symbols).await
    }

    async fn forecast(&self, symbol: &str) -> RiskEngineResult<Vec<Money>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        self.0.forecast(symbol).await
    }
}

#[tokio::test]
async fn test_positions_follow_holdings_order() {
    let source = StaticPriceSource::new()
        .with_quote("AAPL", quote(dec!(100), dec!(99)))
        .with_quote("MSFT", quote(dec!(100), dec!(98)))
        .with_forecast("AAPL", vec![dec!(101); 7]);

    let holdings = vec![holding("MSFT", 2), holding("AAPL", 3), holding("NOPE", 1)];
    let positions = load_positions(&source, &holdings, TIMEOUT).await.unwrap();

    let symbols: Vec<&str> = positions.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["MSFT", "AAPL", "NOPE"]);
    assert_eq!(positions[0].status, DataStatus::ForecastFallback);
    assert_eq!(positions[1].status, DataStatus::Complete);
    assert_eq!(positions[1].forecast_prices, vec![dec!(101); 7]);
    assert_eq!(positions[2].status, DataStatus::Unavailable);
    assert_eq!(positions[2].current_price, Decimal::ZERO);
}

#[tokio::test]
async fn test_failed_quote_request_degrades_every_position() {
    let holdings = vec![holding("AAPL", 1), holding("MSFT", 1)];
    let positions = load_positions(&FailingSource, &holdings, TIMEOUT)
        .await
        .unwrap();
    assert!(positions
        .iter()
        .all(|p| p.status == DataStatus::Unavailable));

    let out = calculate_portfolio_risk(&PortfolioRiskInput {
        positions,
        confidence_level: 99,
        horizon_days: 1,
    })
    .unwrap();
    assert_eq!(out.result.value_at_risk, Decimal::ZERO);
}

#[tokio::test]
async fn test_forecast_timeout_falls_back() {
    let inner = StaticPriceSource::new()
        .with_quote("TSLA", quote(dec!(110), dec!(100)))
        .with_forecast("TSLA", vec![dec!(120); 7]);
    let source = SlowForecastSource(inner);

    let positions = load_positions(&source, &[holding("TSLA", 4)], TIMEOUT)
        .await
        .unwrap();
    assert_eq!(positions[0].status, DataStatus::ForecastFallback);
    assert_eq!(positions[0].forecast_prices[0], dec!(121));
}

#[tokio::test]
async fn test_works_through_trait_object() {
    let source: Box<dyn PriceSource> =
        Box::new(StaticPriceSource::new().with_quote("AMZN", quote(dec!(150), dec!(150))));
    let positions = load_positions(source.as_ref(), &[holding("AMZN", 2)], TIMEOUT)
        .await
        .unwrap();
    assert_eq!(positions[0].market_value(), dec!(300));
    assert_eq!(positions[0].name, "Amazon.com Inc.");
}

#[tokio::test]
async fn test_invalid_holdings_rejected() {
    let source = StaticPriceSource::new();
    let err = load_positions(&source, &[holding("AAPL", 0)], TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, RiskEngineError::InvalidInput { .. }));
    assert!(load_positions(&source, &[], TIMEOUT).await.is_err());
}

#[tokio::test]
async fn test_unnormalised_symbols_still_match_quotes() {
    let source = StaticPriceSource::new().with_quote("AAPL", quote(dec!(100), dec!(99)));
    let positions = load_positions(&source, &[holding(" aapl", 3)], TIMEOUT)
        .await
        .unwrap();
    assert_eq!(positions[0].symbol, "AAPL");
    assert_eq!(positions[0].status, DataStatus::ForecastFallback);
    assert_eq!(positions[0].market_value(), dec!(300));
}
