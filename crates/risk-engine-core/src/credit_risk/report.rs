//! Human-readable wording for a credit decision. Kept apart from the
//! decision predicate so the predicate never depends on phrasing.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::application::LoanApplication;
use super::decision::{LoanDecision, RejectionReason};
use super::metrics::RiskMetrics;

pub const APPROVAL_MESSAGE: &str = "Meets all credit criteria";
pub const REJECTION_PREFIX: &str = "Does not meet minimum credit requirements";
pub const FALLBACK_REASON: &str = "overall risk assessment";

pub const IMPROVEMENT_TIPS: [&str; 5] = [
    "Paying down existing debts",
    "Increasing your income",
    "Applying for a smaller loan amount",
    "Improving your credit score",
    "Adding a co-signer with good credit",
];

/// English list joining: "a", "a and b", "a, b, and c".
pub fn join_reasons(reasons: &[RejectionReason]) -> String {
    match reasons {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|r| r.as_str()).collect();
            format!("{}, and {last}", head.join(", "))
        }
    }
}

/// One-line verdict for the decision card.
pub fn decision_message(decision: &LoanDecision) -> String {
    if decision.approved {
        return APPROVAL_MESSAGE.to_string();
    }
    if decision.reasons.is_empty() {
        format!("{REJECTION_PREFIX} due to {FALLBACK_REASON}")
    } else {
        format!("{REJECTION_PREFIX} due to {}", join_reasons(&decision.reasons))
    }
}

/// Applicant-facing explanation per rejection reason. The DTI reason
/// expands to two lines: total ratio, then the new payment's share.
pub fn rejection_details(
    app: &LoanApplication,
    metrics: &RiskMetrics,
    decision: &LoanDecision,
) -> Vec<String> {
    let mut details = Vec::new();
    for reason in &decision.reasons {
        match reason {
            RejectionReason::LowCreditScore => details.push(format!(
                "Your credit score ({}) is considered too low for approval. \
                 Most lenders look for scores above 650.",
                app.credit_score
            )),
            RejectionReason::HighDebtToIncome => {
                let monthly_income = app.income / dec!(12);
                let payment_share = if monthly_income.is_zero() {
                    Decimal::ZERO
                } else {
                    metrics.monthly_payment / monthly_income * dec!(100)
                };
                details.push(format!(
                    "Your total debt-to-income ratio ({}%) exceeds the recommended maximum of 40%",
                    one_dp(metrics.debt_to_income * dec!(100))
                ));
                details.push(format!(
                    "The new loan payment would be {}% of your monthly income",
                    one_dp(payment_share)
                ));
            }
            RejectionReason::EmploymentStatus => details.push(format!(
                "Your employment status ({}) may be affecting your application. \
                 Stable, long-term employment is preferred.",
                app.employment
            )),
            RejectionReason::LongerLoanTerm => details.push(format!(
                "The requested loan term ({} months) may be too long for the requested amount.",
                app.term.months()
            )),
        }
    }
    details
}

fn one_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
