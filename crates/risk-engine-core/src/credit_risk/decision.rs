use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::metrics::RiskMetrics;
use super::scoring::ScoreCategory;

/// Approval thresholds. All three must hold.
pub const MIN_APPROVAL_SCORE: Decimal = dec!(60);
pub const MAX_APPROVAL_PD: Decimal = dec!(5);
pub const MAX_APPROVAL_DTI: Decimal = dec!(0.4);

const MIN_EMPLOYMENT_SCORE: Decimal = dec!(60);
const MIN_TERM_SCORE: Decimal = dec!(70);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Why an application was turned down, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionReason {
    #[serde(rename = "low credit score")]
    LowCreditScore,
    #[serde(rename = "high debt-to-income ratio")]
    HighDebtToIncome,
    #[serde(rename = "employment status")]
    EmploymentStatus,
    #[serde(rename = "longer loan term")]
    LongerLoanTerm,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::LowCreditScore => "low credit score",
            RejectionReason::HighDebtToIncome => "high debt-to-income ratio",
            RejectionReason::EmploymentStatus => "employment status",
            RejectionReason::LongerLoanTerm => "longer loan term",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDecision {
    pub approved: bool,
    pub risk_level: RiskLevel,
    /// Empty whenever the application is approved
    pub reasons: Vec<RejectionReason>,
}

/// Risk band from the score alone, independent of approval.
pub fn risk_level(risk_score: Decimal) -> RiskLevel {
    if risk_score >= dec!(80) {
        RiskLevel::Low
    } else if risk_score >= dec!(60) {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn is_approved(metrics: &RiskMetrics) -> bool {
    metrics.risk_score >= MIN_APPROVAL_SCORE
        && metrics.probability_of_default <= MAX_APPROVAL_PD
        && metrics.debt_to_income <= MAX_APPROVAL_DTI
}

/// Every factor that counts against the application, whether or not
/// the application clears the approval thresholds.
pub fn adverse_factors(metrics: &RiskMetrics) -> Vec<RejectionReason> {
    let mut reasons = Vec::new();
    if matches!(
        metrics.components.credit_score.category,
        ScoreCategory::Poor | ScoreCategory::VeryPoor
    ) {
        reasons.push(RejectionReason::LowCreditScore);
    }
    if metrics.debt_to_income > MAX_APPROVAL_DTI {
        reasons.push(RejectionReason::HighDebtToIncome);
    }
    if metrics.components.employment.score < MIN_EMPLOYMENT_SCORE {
        reasons.push(RejectionReason::EmploymentStatus);
    }
    if metrics.components.term.score < MIN_TERM_SCORE {
        reasons.push(RejectionReason::LongerLoanTerm);
    }
    reasons
}

pub fn decide(metrics: &RiskMetrics) -> LoanDecision {
    let approved = is_approved(metrics);
    LoanDecision {
        approved,
        risk_level: risk_level(metrics.risk_score),
        reasons: if approved {
            Vec::new()
        } else {
            adverse_factors(metrics)
        },
    }
}
