use pretty_assertions::assert_eq;
use risk_engine_core::portfolio_risk::aggregator::{
    calculate_portfolio_risk, ConfidenceLevel, PortfolioRiskInput,
};
use risk_engine_core::portfolio_risk::position::{build_position, PortfolioPosition, PriceQuote};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn priced(symbol: &str, quantity: u64, current: Decimal, previous: Decimal) -> PortfolioPosition {
    let quote = PriceQuote {
        current: Some(current),
        previous_close: Some(previous),
        ..Default::default()
    };
    build_position(symbol, quantity, Some(&quote), None)
}

// ===========================================================================
// Reference portfolios
// ===========================================================================

#[test]
fn test_single_position_takes_whole_portfolio() {
    let input = PortfolioRiskInput {
        positions: vec![priced("AAPL", 10, dec!(100), dec!(98))],
        confidence_level: 95,
        horizon_days: 1,
    };
    let out = calculate_portfolio_risk(&input).unwrap().result;

    assert_eq!(out.positions[0].value, dec!(1000));
    assert_eq!(out.total_value, dec!(1000));
    assert_eq!(out.positions[0].weight, dec!(100));
    assert!(out.value_at_risk > Decimal::ZERO);
    assert_eq!(out.conditional_value_at_risk, out.value_at_risk * dec!(1.2));
}

#[test]
fn test_worthless_portfolio_has_no_risk() {
    let input = PortfolioRiskInput {
        positions: vec![
            PortfolioPosition::unavailable("AAPL", 10),
            PortfolioPosition::unavailable("MSFT", 4),
        ],
        confidence_level: 99,
        horizon_days: 1,
    };
    let out = calculate_portfolio_risk(&input).unwrap().result;

    assert_eq!(out.total_value, Decimal::ZERO);
    assert!(out.positions.iter().all(|p| p.weight == Decimal::ZERO));
    assert_eq!(out.value_at_risk, Decimal::ZERO);
    assert_eq!(out.annualized_volatility, Decimal::ZERO);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_higher_confidence_means_higher_var() {
    let positions = vec![
        priced("AAPL", 15, dec!(175.43), dec!(171.42)),
        priced("TSLA", 8, dec!(248.50), dec!(256.10)),
    ];
    let var_at = |confidence_level| {
        calculate_portfolio_risk(&PortfolioRiskInput {
            positions: positions.clone(),
            confidence_level,
            horizon_days: 1,
        })
        .unwrap()
        .result
        .value_at_risk
    };
    let v90 = var_at(90);
    let v95 = var_at(95);
    let v99 = var_at(99);
    assert!(v90 < v95 && v95 < v99);
}

#[test]
fn test_flat_prices_carry_no_risk() {
    let input = PortfolioRiskInput {
        positions: vec![priced("MSFT", 3, dec!(378.85), dec!(378.85))],
        confidence_level: 99,
        horizon_days: 10,
    };
    let out = calculate_portfolio_risk(&input).unwrap().result;
    assert_eq!(out.value_at_risk, Decimal::ZERO);
    assert_eq!(out.total_value, dec!(1136.55));
}

#[test]
fn test_unrecognised_confidence_resolves_to_99_with_warning() {
    let positions = serde_json::to_value(vec![priced("AAPL", 10, dec!(100), dec!(98))]).unwrap();
    let json = serde_json::json!({"positions": positions, "confidence_level": 97, "horizon_days": 1});
    let input: PortfolioRiskInput = serde_json::from_value(json).unwrap();
    assert_eq!(input.confidence_level, 97);

    let out = calculate_portfolio_risk(&input).unwrap();
    assert_eq!(out.result.confidence_level, ConfidenceLevel::P99);
    assert_eq!(out.result.z_score, dec!(2.326));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("97%"));
}

#[test]
fn test_portfolio_risk_is_deterministic() {
    let input = PortfolioRiskInput {
        positions: vec![
            priced("GOOGL", 20, dec!(142.56), dec!(143.84)),
            priced("AMZN", 6, dec!(151.94), dec!(148.20)),
        ],
        confidence_level: 95,
        horizon_days: 5,
    };
    let a = calculate_portfolio_risk(&input).unwrap().result;
    let b = calculate_portfolio_risk(&input).unwrap().result;
    assert_eq!(a, b);
}
