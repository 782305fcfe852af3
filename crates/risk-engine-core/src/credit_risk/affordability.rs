use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RiskEngineError;
use crate::types::{Money, Rate};
use crate::RiskEngineResult;

/// Nominal annual rate used to size the new loan's repayment.
pub const ASSUMED_ANNUAL_RATE: Rate = dec!(0.05);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Monthly debt picture for an applicant once the new loan is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordability {
    pub monthly_income: Money,
    /// Estimated obligations already on the applicant's books
    pub existing_monthly_debt: Money,
    pub monthly_loan_payment: Money,
    pub total_monthly_debt: Money,
    /// Total monthly debt / monthly income (ratio, not percent, unclamped)
    pub debt_to_income: Rate,
    /// New loan payment / monthly income
    pub payment_to_income: Rate,
}

/// Share of monthly income assumed to service existing debt.
///
/// Stands in for bureau data: weaker scores are assumed to carry heavier
/// existing obligations.
pub fn existing_debt_factor(credit_score: u32) -> Rate {
    if credit_score < 600 {
        dec!(0.35)
    } else if credit_score < 700 {
        dec!(0.25)
    } else if credit_score < 800 {
        dec!(0.15)
    } else {
        dec!(0.10)
    }
}

/// Level payment on a fully amortising loan.
///
/// payment = P * r(1+r)^n / ((1+r)^n - 1), with r the monthly rate;
/// a zero rate repays principal in equal instalments.
pub fn monthly_payment(
    principal: Money,
    annual_rate: Rate,
    num_payments: u32,
) -> RiskEngineResult<Money> {
    if num_payments == 0 {
        return Err(RiskEngineError::InvalidInput {
            field: "num_payments".into(),
            reason: "Loan must have at least one payment".into(),
        });
    }

    let n = Decimal::from(num_payments);
    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }

    let growth = (Decimal::ONE + monthly_rate).powi(num_payments as i64);
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(RiskEngineError::DivisionByZero {
            context: "amortisation factor".into(),
        });
    }

    Ok(principal * (monthly_rate * growth) / denominator)
}

/// Debt-to-income after adding the requested loan to estimated existing debt.
pub fn calculate_affordability(
    annual_income: Money,
    loan_amount: Money,
    credit_score: u32,
    term_months: u32,
) -> RiskEngineResult<Affordability> {
    let monthly_income = annual_income / MONTHS_PER_YEAR;
    if monthly_income.is_zero() {
        return Err(RiskEngineError::DivisionByZero {
            context: "debt-to-income (monthly income is zero)".into(),
        });
    }

    let existing_monthly_debt = monthly_income * existing_debt_factor(credit_score);
    let monthly_loan_payment = monthly_payment(loan_amount, ASSUMED_ANNUAL_RATE, term_months)?;
    let total_monthly_debt = existing_monthly_debt + monthly_loan_payment;

    let ratio = |debt: Money| {
        debt.checked_div(monthly_income)
            .ok_or_else(|| RiskEngineError::InvalidInput {
                field: "income".into(),
                reason: "Income too small relative to the loan to compute debt-to-income".into(),
            })
    };

    Ok(Affordability {
        monthly_income,
        existing_monthly_debt,
        monthly_loan_payment,
        total_monthly_debt,
        debt_to_income: ratio(total_monthly_debt)?,
        payment_to_income: ratio(monthly_loan_payment)?,
    })
}
