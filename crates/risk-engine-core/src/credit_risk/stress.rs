use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::application::{validate_application, LoanApplication, MIN_CREDIT_SCORE};
use super::decision::{decide, LoanDecision};
use super::metrics::{calculate_risk_metrics, RiskMetrics};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::RiskEngineResult;

/// Income retained under the adverse scenario.
pub const ADVERSE_INCOME_FACTOR: Rate = dec!(0.8);
/// Credit score points lost under the adverse scenario.
pub const ADVERSE_SCORE_SHOCK: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub application: LoanApplication,
    pub metrics: RiskMetrics,
    pub decision: LoanDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressTestOutput {
    pub base: ScenarioResult,
    pub adverse: ScenarioResult,
    /// Adverse minus base
    pub pd_change: Percent,
    pub expected_loss_change: Money,
    pub rwa_change: Money,
    pub risk_score_change: Decimal,
}

/// Income down 20%, credit score down 50 points (floored at 300).
pub fn adverse_application(app: &LoanApplication) -> LoanApplication {
    LoanApplication {
        income: app.income * ADVERSE_INCOME_FACTOR,
        credit_score: app
            .credit_score
            .saturating_sub(ADVERSE_SCORE_SHOCK)
            .max(MIN_CREDIT_SCORE),
        ..app.clone()
    }
}

fn run_scenario(name: &str, app: LoanApplication) -> RiskEngineResult<ScenarioResult> {
    let metrics = calculate_risk_metrics(&app)?;
    let decision = decide(&metrics);
    Ok(ScenarioResult {
        name: name.to_string(),
        application: app,
        metrics,
        decision,
    })
}

/// Compare base-case metrics with the adverse scenario.
pub fn run_stress_test(
    app: &LoanApplication,
) -> RiskEngineResult<ComputationOutput<StressTestOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_application(app)?;

    let base = run_scenario("Base Case", app.clone())?;
    let adverse = run_scenario("Adverse Scenario", adverse_application(app))?;

    if base.decision.approved && !adverse.decision.approved {
        warnings.push("Approval does not survive the adverse scenario".into());
    }

    let output = StressTestOutput {
        pd_change: adverse.metrics.probability_of_default - base.metrics.probability_of_default,
        expected_loss_change: adverse.metrics.expected_loss - base.metrics.expected_loss,
        rwa_change: adverse.metrics.risk_weighted_assets - base.metrics.risk_weighted_assets,
        risk_score_change: adverse.metrics.risk_score - base.metrics.risk_score,
        base,
        adverse,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-scenario credit stress test (base vs. income and credit score shock)",
        &serde_json::json!({
            "income_factor": ADVERSE_INCOME_FACTOR.to_string(),
            "credit_score_shock": ADVERSE_SCORE_SHOCK,
            "credit_score_floor": MIN_CREDIT_SCORE,
        }),
        warnings,
        elapsed,
        output,
    ))
}
