use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::affordability::{calculate_affordability, Affordability};
use super::application::{validate_application, LoanApplication};
use super::scoring::{score_components, ScoreComponents};
use crate::types::{Money, Percent, Rate};
use crate::RiskEngineResult;

/// Loss given default applied to every exposure.
pub const LOSS_GIVEN_DEFAULT: Rate = dec!(0.4);

/// Floor and ceiling of the PD scale, in percent.
pub const MIN_PROBABILITY_OF_DEFAULT: Percent = dec!(0.1);
pub const MAX_PROBABILITY_OF_DEFAULT: Percent = dec!(10);

/// Rate charged to a perfect score, in percent.
pub const BASE_INTEREST_RATE: Percent = dec!(5.0);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Weighted component score, higher is safer. The weights total 0.9,
    /// so the reachable range is 18-90.
    pub risk_score: Decimal,
    /// risk_score rescaled by the component weight total
    pub normalised_score: Decimal,
    /// Probability of default in percent, 0.1-10
    pub probability_of_default: Percent,
    pub expected_loss: Money,
    pub risk_weighted_assets: Money,
    /// Ratio, not percent
    pub debt_to_income: Rate,
    /// Risk-priced annual rate in percent
    pub interest_rate: Percent,
    /// Repayment on the new loan at the assumed 5% rate
    pub monthly_payment: Money,
    pub components: ScoreComponents,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

pub fn risk_score(components: &ScoreComponents) -> Decimal {
    components.weighted_score()
}

/// PD falls linearly from 10% at score 0, floored at 0.1%.
pub fn probability_of_default(risk_score: Decimal) -> Percent {
    let pd = (dec!(100) - risk_score) / dec!(100) * dec!(10);
    pd.max(MIN_PROBABILITY_OF_DEFAULT)
}

/// EL = PD x LGD x EAD, with EAD equal to the loan amount.
pub fn expected_loss(probability_of_default: Percent, loan_amount: Money) -> Money {
    probability_of_default / dec!(100) * LOSS_GIVEN_DEFAULT * loan_amount
}

/// Simplified capital-weighting proxy: exposure scaled by 1 + 10 x PD.
pub fn risk_weighted_assets(probability_of_default: Percent, loan_amount: Money) -> Money {
    loan_amount * (Decimal::ONE + probability_of_default / dec!(100) * dec!(10))
}

/// Base rate plus one point of premium per ten points of score shortfall.
pub fn interest_rate(risk_score: Decimal) -> Percent {
    BASE_INTEREST_RATE + (dec!(100) - risk_score) / dec!(10)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Validate the application, then score it and derive every risk metric.
pub fn calculate_risk_metrics(app: &LoanApplication) -> RiskEngineResult<RiskMetrics> {
    calculate_metrics_with_affordability(app).map(|(metrics, _)| metrics)
}

/// As [`calculate_risk_metrics`], also returning the affordability
/// breakdown the debt-to-income ratio came from.
pub fn calculate_metrics_with_affordability(
    app: &LoanApplication,
) -> RiskEngineResult<(RiskMetrics, Affordability)> {
    validate_application(app)?;

    let affordability = calculate_affordability(
        app.income,
        app.loan_amount,
        app.credit_score,
        app.term.months(),
    )?;
    let components = score_components(app, affordability.debt_to_income)?;

    let score = risk_score(&components);
    let total_weight = components.total_weight();
    let normalised_score = if total_weight.is_zero() {
        Decimal::ZERO
    } else {
        score / total_weight
    };
    let pd = probability_of_default(score);

    let metrics = RiskMetrics {
        risk_score: score,
        normalised_score,
        probability_of_default: pd,
        expected_loss: expected_loss(pd, app.loan_amount),
        risk_weighted_assets: risk_weighted_assets(pd, app.loan_amount),
        debt_to_income: affordability.debt_to_income,
        interest_rate: interest_rate(score),
        monthly_payment: affordability.monthly_loan_payment,
        components,
    };
    Ok((metrics, affordability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credit_risk::application::{EmploymentStatus, LoanTerm};
    use crate::credit_risk::scoring::ScoreCategory;

    fn sample() -> LoanApplication {
        LoanApplication {
            income: dec!(60_000),
            loan_amount: dec!(20_000),
            credit_score: 720,
            employment: EmploymentStatus::FullTime,
            term: LoanTerm::Months36,
        }
    }

    #[test]
    fn test_sample_application_scores() {
        let m = calculate_risk_metrics(&sample()).unwrap();
        assert_eq!(m.components.credit_score.category, ScoreCategory::Good);
        assert_eq!(m.components.credit_score.score, dec!(80));
        assert_eq!(m.components.credit_score.weight, dec!(0.3));
        // DTI ~0.27 => good income ratio band
        assert_eq!(m.components.income_ratio.category, ScoreCategory::Good);
        // 80*0.3 + 80*0.25 + 100*0.2 + 80*0.15 = 24 + 20 + 20 + 12
        assert_eq!(m.risk_score, dec!(76));
        assert_eq!(m.probability_of_default, dec!(2.4));
        assert_eq!(m.interest_rate, dec!(7.4));
    }

    #[test]
    fn test_pd_floor() {
        assert_eq!(probability_of_default(dec!(100)), dec!(0.1));
        assert_eq!(probability_of_default(dec!(99.5)), dec!(0.1));
        assert_eq!(probability_of_default(Decimal::ZERO), dec!(10));
    }

    #[test]
    fn test_expected_loss_formula() {
        // 2.4% x 40% x 20,000 = 192
        assert_eq!(expected_loss(dec!(2.4), dec!(20_000)), dec!(192));
    }

    #[test]
    fn test_rwa_formula() {
        // 20,000 x (1 + 0.024 x 10) = 24,800
        assert_eq!(risk_weighted_assets(dec!(2.4), dec!(20_000)), dec!(24_800));
    }

    #[test]
    fn test_interest_rate_decreases_with_score() {
        assert!(interest_rate(dec!(80)) < interest_rate(dec!(60)));
        assert_eq!(interest_rate(dec!(100)), dec!(5));
    }

    #[test]
    fn test_normalised_score_rescales_by_weight_total() {
        let m = calculate_risk_metrics(&sample()).unwrap();
        assert_eq!(m.components.total_weight(), dec!(0.9));
        let rescaled = m.normalised_score * dec!(0.9);
        assert!((rescaled - m.risk_score).abs() < dec!(0.0000001));
        assert!(m.normalised_score <= dec!(100));
    }

    #[test]
    fn test_affordability_matches_metrics() {
        let (m, a) = calculate_metrics_with_affordability(&sample()).unwrap();
        assert_eq!(m, calculate_risk_metrics(&sample()).unwrap());
        assert_eq!(a.debt_to_income, m.debt_to_income);
        assert_eq!(a.monthly_loan_payment, m.monthly_payment);
        assert_eq!(a.monthly_income, dec!(5_000));
    }

    #[test]
    fn test_invalid_application_never_scored() {
        let mut app = sample();
        app.credit_score = 200;
        assert!(calculate_risk_metrics(&app).is_err());
    }
}
