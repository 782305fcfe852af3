use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use risk_engine_core::credit_risk::application::LoanApplication;
use risk_engine_core::credit_risk::{assessment, stress};
use risk_engine_core::market_data::{normalise_holdings, Holding, StaticPriceSource};
use risk_engine_core::portfolio_risk::aggregator::{self, PortfolioRiskInput};
use risk_engine_core::portfolio_risk::position::{build_position, PortfolioPosition};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Credit risk
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_credit(input_json: String) -> NapiResult<String> {
    let input: LoanApplication = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = assessment::assess_credit_risk(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn credit_stress_test(input_json: String) -> NapiResult<String> {
    let input: LoanApplication = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = stress::run_stress_test(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio risk
// ---------------------------------------------------------------------------

#[napi]
pub fn portfolio_risk(input_json: String) -> NapiResult<String> {
    let input: PortfolioRiskInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = aggregator::calculate_portfolio_risk(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Holdings plus the quotes and forecasts already fetched by the caller.
#[derive(Deserialize)]
struct BuildPositionsInput {
    holdings: Vec<Holding>,
    #[serde(flatten)]
    prices: StaticPriceSource,
}

#[napi]
pub fn build_positions(input_json: String) -> NapiResult<String> {
    let input: BuildPositionsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let holdings = normalise_holdings(&input.holdings).map_err(to_napi_error)?;
    let positions: Vec<PortfolioPosition> = holdings
        .iter()
        .map(|h| {
            build_position(
                &h.symbol,
                h.quantity,
                input.prices.quotes.get(&h.symbol),
                input.prices.forecasts.get(&h.symbol).cloned(),
            )
        })
        .collect();
    serde_json::to_string(&positions).map_err(to_napi_error)
}
