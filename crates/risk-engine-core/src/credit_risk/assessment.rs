use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::affordability::{Affordability, ASSUMED_ANNUAL_RATE};
use super::application::LoanApplication;
use super::decision::{decide, LoanDecision};
use super::metrics::{calculate_metrics_with_affordability, RiskMetrics, LOSS_GIVEN_DEFAULT};
use super::report::{decision_message, rejection_details, IMPROVEMENT_TIPS};
use crate::types::{with_metadata, ComputationOutput};
use crate::RiskEngineResult;

/// Everything the decision card needs for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub metrics: RiskMetrics,
    pub decision: LoanDecision,
    pub affordability: Affordability,
    pub message: String,
    pub rejection_details: Vec<String>,
    pub improvement_tips: Vec<String>,
}

/// Full credit pipeline: validate, score, decide, explain.
pub fn assess_credit_risk(
    app: &LoanApplication,
) -> RiskEngineResult<ComputationOutput<CreditAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (metrics, affordability) = calculate_metrics_with_affordability(app)?;
    let decision = decide(&metrics);

    if !decision.approved && decision.reasons.is_empty() {
        warnings.push(
            "Rejected on combined thresholds; no individual factor breached its limit".into(),
        );
    }

    let assessment = CreditAssessment {
        message: decision_message(&decision),
        rejection_details: rejection_details(app, &metrics, &decision),
        improvement_tips: if decision.approved {
            Vec::new()
        } else {
            IMPROVEMENT_TIPS.iter().map(|t| t.to_string()).collect()
        },
        metrics,
        decision,
        affordability,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Weighted factor scorecard with amortisation-based DTI and Basel-style PD/EL/RWA",
        &serde_json::json!({
            "assumed_annual_rate": ASSUMED_ANNUAL_RATE.to_string(),
            "loss_given_default": LOSS_GIVEN_DEFAULT.to_string(),
            "exposure_at_default": "loan_amount",
            "existing_debt": "estimated from credit score band",
        }),
        warnings,
        elapsed,
        assessment,
    ))
}
