use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::position::{DataStatus, PortfolioPosition};
use crate::error::RiskEngineError;
use crate::types::*;
use crate::RiskEngineResult;

pub const TRADING_DAYS_PER_YEAR: Decimal = dec!(252);

/// Tail multiplier applied to VaR to approximate expected shortfall.
pub const CVAR_MULTIPLIER: Decimal = dec!(1.2);

// ---------------------------------------------------------------------------
// Confidence level
// ---------------------------------------------------------------------------

/// Supported one-tailed confidence levels. Serialised as the percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ConfidenceLevel {
    P90,
    P95,
    #[default]
    P99,
}

impl ConfidenceLevel {
    /// Unrecognised percentages fall back to 99.
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            90 => ConfidenceLevel::P90,
            95 => ConfidenceLevel::P95,
            _ => ConfidenceLevel::P99,
        }
    }

    pub fn is_recognised(percent: u32) -> bool {
        matches!(percent, 90 | 95 | 99)
    }

    /// Resolve a requested percentage, with a warning when it had to fall back.
    pub fn resolve(percent: u32) -> (Self, Option<String>) {
        let level = ConfidenceLevel::from_percent(percent);
        if ConfidenceLevel::is_recognised(percent) {
            (level, None)
        } else {
            tracing::warn!(confidence = percent, "Unsupported confidence level, using 99%");
            (
                level,
                Some(format!(
                    "Confidence level {percent}% is not supported; {}% used",
                    level.percent()
                )),
            )
        }
    }

    pub fn percent(&self) -> u32 {
        match self {
            ConfidenceLevel::P90 => 90,
            ConfidenceLevel::P95 => 95,
            ConfidenceLevel::P99 => 99,
        }
    }

    pub fn z_score(&self) -> Decimal {
        match self {
            ConfidenceLevel::P90 => dec!(1.282),
            ConfidenceLevel::P95 => dec!(1.645),
            ConfidenceLevel::P99 => dec!(2.326),
        }
    }
}

impl From<u32> for ConfidenceLevel {
    fn from(percent: u32) -> Self {
        ConfidenceLevel::from_percent(percent)
    }
}

impl From<ConfidenceLevel> for u32 {
    fn from(level: ConfidenceLevel) -> Self {
        level.percent()
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

fn default_confidence_level() -> u32 {
    99
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioRiskInput {
    pub positions: Vec<PortfolioPosition>,
    /// Requested percent; anything but 90, 95 or 99 resolves to 99
    #[serde(default = "default_confidence_level")]
    pub confidence_level: u32,
    /// VaR horizon in trading days, at least 1
    pub horizon_days: u32,
}

/// A position with its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRisk {
    #[serde(flatten)]
    pub position: PortfolioPosition,
    pub value: Money,
    /// Percent of total value; 0 when the portfolio is worth nothing
    pub weight: Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub positions: Vec<PositionRisk>,
    pub total_value: Money,
    pub value_at_risk: Money,
    pub conditional_value_at_risk: Money,
    /// Annualised volatility in percent
    pub annualized_volatility: Percent,
    /// Weighted one-day return (decimal)
    pub expected_daily_return: Rate,
    pub confidence_level: ConfidenceLevel,
    pub z_score: Decimal,
    pub horizon_days: u32,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Parametric VaR/CVaR over a set of priced positions.
///
/// Variance is the sum of squared weighted daily returns, so positions are
/// treated as uncorrelated.
pub fn calculate_portfolio_risk(
    input: &PortfolioRiskInput,
) -> RiskEngineResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.positions.is_empty() {
        return Err(RiskEngineError::InsufficientData(
            "At least one position is required".into(),
        ));
    }
    if input.horizon_days == 0 {
        return Err(RiskEngineError::InvalidInput {
            field: "horizon_days".into(),
            reason: "Horizon must be at least one day".into(),
        });
    }

    let (confidence_level, confidence_warning) = ConfidenceLevel::resolve(input.confidence_level);
    warnings.extend(confidence_warning);

    let values: Vec<Money> = input
        .positions
        .iter()
        .map(|p| p.checked_market_value().ok_or_else(|| out_of_range(&p.symbol)))
        .collect::<RiskEngineResult<_>>()?;
    let total_value = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| out_of_range("total value"))?;

    let positions: Vec<PositionRisk> = input
        .positions
        .iter()
        .zip(&values)
        .map(|(position, value)| PositionRisk {
            position: position.clone(),
            value: *value,
            weight: if total_value.is_zero() {
                Decimal::ZERO
            } else {
                *value / total_value * dec!(100)
            },
        })
        .collect();

    let mut variance = Decimal::ZERO;
    let mut expected_daily_return = Decimal::ZERO;
    for p in &positions {
        let weighted = (p.weight / dec!(100))
            .checked_mul(p.position.daily_return)
            .ok_or_else(|| out_of_range(&p.position.symbol))?;
        variance = weighted
            .checked_mul(weighted)
            .and_then(|sq| variance.checked_add(sq))
            .ok_or_else(|| out_of_range(&p.position.symbol))?;
        expected_daily_return += weighted;
    }

    let sqrt_year = sqrt_decimal(TRADING_DAYS_PER_YEAR);
    let daily_volatility = sqrt_decimal(variance);
    let annualized_volatility = daily_volatility * sqrt_year;

    let z_score = confidence_level.z_score();
    let horizon = Decimal::from(input.horizon_days);
    let value_at_risk = total_value
        .checked_mul(z_score)
        .and_then(|v| v.checked_mul(daily_volatility))
        .and_then(|v| v.checked_mul(sqrt_decimal(horizon)))
        .ok_or_else(|| out_of_range("value at risk"))?;
    let conditional_value_at_risk = value_at_risk
        .checked_mul(CVAR_MULTIPLIER)
        .ok_or_else(|| out_of_range("conditional value at risk"))?;

    if total_value.is_zero() {
        warnings.push("Portfolio has zero market value; risk figures are zero".into());
    }
    for p in &positions {
        if p.position.status == DataStatus::Unavailable {
            warnings.push(format!(
                "{}: no price data, position valued at zero",
                p.position.symbol
            ));
        }
    }

    let output = PortfolioSummary {
        positions,
        total_value,
        value_at_risk,
        conditional_value_at_risk,
        annualized_volatility: annualized_volatility * dec!(100),
        expected_daily_return,
        confidence_level,
        z_score,
        horizon_days: input.horizon_days,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Parametric VaR with uncorrelated position variance; CVaR = 1.2 x VaR",
        &serde_json::json!({
            "positions": input.positions.len(),
            "confidence_level": confidence_level.percent(),
            "horizon_days": input.horizon_days,
            "trading_days_per_year": TRADING_DAYS_PER_YEAR.to_string(),
            "correlation": "ignored",
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn out_of_range(what: &str) -> RiskEngineError {
    RiskEngineError::InvalidInput {
        field: "positions".into(),
        reason: format!("{what}: prices too large to aggregate"),
    }
}

fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(
        symbol: &str,
        quantity: u64,
        price: Decimal,
        daily_return: Decimal,
    ) -> PortfolioPosition {
        PortfolioPosition {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            quantity,
            current_price: price,
            previous_close: price,
            daily_return,
            historical_prices: vec![price; 5],
            forecast_prices: vec![price; 7],
            status: DataStatus::Complete,
        }
    }

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    #[test]
    fn test_z_scores() {
        assert_eq!(ConfidenceLevel::P90.z_score(), dec!(1.282));
        assert_eq!(ConfidenceLevel::P95.z_score(), dec!(1.645));
        assert_eq!(ConfidenceLevel::P99.z_score(), dec!(2.326));
        assert_eq!(ConfidenceLevel::from_percent(97), ConfidenceLevel::P99);
    }

    #[test]
    fn test_confidence_level_serde_as_percent() {
        let level: ConfidenceLevel = serde_json::from_str("95").unwrap();
        assert_eq!(level, ConfidenceLevel::P95);
        assert_eq!(serde_json::to_string(&ConfidenceLevel::P90).unwrap(), "90");
    }

    #[test]
    fn test_single_position_var() {
        let input = PortfolioRiskInput {
            positions: vec![position("AAPL", 10, dec!(100), dec!(0.02))],
            confidence_level: 99,
            horizon_days: 1,
        };
        let out = calculate_portfolio_risk(&input).unwrap().result;
        assert_eq!(out.total_value, dec!(1000));
        assert_eq!(out.positions[0].weight, dec!(100));
        // daily vol = 2%, VaR = 1000 * 2.326 * 0.02
        assert_close(out.value_at_risk, dec!(46.52), dec!(0.0001));
        assert_close(out.conditional_value_at_risk, dec!(55.824), dec!(0.0001));
        assert_close(out.annualized_volatility, dec!(31.749), dec!(0.001));
    }

    #[test]
    fn test_var_scales_with_root_horizon() {
        let mut input = PortfolioRiskInput {
            positions: vec![position("AAPL", 10, dec!(100), dec!(0.02))],
            confidence_level: 95,
            horizon_days: 1,
        };
        let one_day = calculate_portfolio_risk(&input).unwrap().result.value_at_risk;
        input.horizon_days = 4;
        let four_day = calculate_portfolio_risk(&input).unwrap().result.value_at_risk;
        assert_close(four_day, one_day * dec!(2), dec!(0.0001));
    }

    #[test]
    fn test_weights_sum_to_hundred() {
        let input = PortfolioRiskInput {
            positions: vec![
                position("AAPL", 3, dec!(175.43), dec!(0.0234)),
                position("MSFT", 7, dec!(378.85), dec!(0.0156)),
                position("GOOGL", 11, dec!(142.56), dec!(-0.0089)),
            ],
            confidence_level: 95,
            horizon_days: 1,
        };
        let out = calculate_portfolio_risk(&input).unwrap().result;
        let total: Decimal = out.positions.iter().map(|p| p.weight).sum();
        assert_close(total, dec!(100), dec!(0.0000001));
    }

    #[test]
    fn test_zero_value_portfolio() {
        let input = PortfolioRiskInput {
            positions: vec![
                PortfolioPosition::unavailable("AAA", 5),
                PortfolioPosition::unavailable("BBB", 2),
            ],
            confidence_level: 99,
            horizon_days: 10,
        };
        let out = calculate_portfolio_risk(&input).unwrap();
        assert!(out.result.positions.iter().all(|p| p.weight.is_zero()));
        assert_eq!(out.result.value_at_risk, Decimal::ZERO);
        assert_eq!(out.result.conditional_value_at_risk, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 3);
    }

    #[test]
    fn test_unrecognised_confidence_warns_and_uses_99() {
        let input: PortfolioRiskInput = serde_json::from_value(serde_json::json!({
            "positions": [position("AAPL", 10, dec!(100), dec!(0.02))],
            "confidence_level": 97,
            "horizon_days": 1,
        }))
        .unwrap();
        let out = calculate_portfolio_risk(&input).unwrap();
        assert_eq!(out.result.confidence_level, ConfidenceLevel::P99);
        assert_eq!(out.result.z_score, dec!(2.326));
        assert_eq!(
            out.warnings,
            vec!["Confidence level 97% is not supported; 99% used".to_string()]
        );
    }

    #[test]
    fn test_recognised_confidence_has_no_warning() {
        let input = PortfolioRiskInput {
            positions: vec![position("AAPL", 10, dec!(100), dec!(0.02))],
            confidence_level: 90,
            horizon_days: 1,
        };
        let out = calculate_portfolio_risk(&input).unwrap();
        assert_eq!(out.result.confidence_level, ConfidenceLevel::P90);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_missing_confidence_defaults_to_99() {
        let input: PortfolioRiskInput =
            serde_json::from_str(r#"{"positions":[],"horizon_days":1}"#).unwrap();
        assert_eq!(input.confidence_level, 99);
    }

    #[test]
    fn test_oversized_position_is_an_error_not_a_panic() {
        let input = PortfolioRiskInput {
            positions: vec![position("BIG", u64::MAX, Decimal::MAX, dec!(0.01))],
            confidence_level: 99,
            horizon_days: 1,
        };
        let err = calculate_portfolio_risk(&input).unwrap_err();
        assert!(matches!(err, RiskEngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_portfolio_rejected() {
        let input = PortfolioRiskInput {
            positions: vec![],
            confidence_level: 99,
            horizon_days: 1,
        };
        assert!(calculate_portfolio_risk(&input).is_err());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let input = PortfolioRiskInput {
            positions: vec![position("AAPL", 1, dec!(10), dec!(0.01))],
            confidence_level: 99,
            horizon_days: 0,
        };
        assert!(calculate_portfolio_risk(&input).is_err());
    }
}
