use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RiskEngineError;
use crate::types::Money;
use crate::RiskEngineResult;

pub const MIN_CREDIT_SCORE: u32 = 300;
pub const MAX_CREDIT_SCORE: u32 = 850;

/// Largest income or loan amount accepted; keeps every derived figure
/// well inside the decimal range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000);

// ---------------------------------------------------------------------------
// Employment status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    FullTime,
    PartTime,
    SelfEmployed,
    Contractor,
    Unemployed,
    Retired,
}

impl EmploymentStatus {
    pub const ALL: [EmploymentStatus; 6] = [
        EmploymentStatus::FullTime,
        EmploymentStatus::PartTime,
        EmploymentStatus::SelfEmployed,
        EmploymentStatus::Contractor,
        EmploymentStatus::Unemployed,
        EmploymentStatus::Retired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::FullTime => "full-time",
            EmploymentStatus::PartTime => "part-time",
            EmploymentStatus::SelfEmployed => "self-employed",
            EmploymentStatus::Contractor => "contractor",
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::Retired => "retired",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentStatus {
    type Err = RiskEngineError;

    /// Accepts the kebab-case names plus `snake_case` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace('_', "-");
        EmploymentStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalised)
            .ok_or_else(|| RiskEngineError::UnsupportedCategory {
                table: "employment".into(),
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Loan term
// ---------------------------------------------------------------------------

/// Supported amortisation terms. Serialised as the number of months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LoanTerm {
    Months12,
    Months24,
    Months36,
    Months48,
    Months60,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 5] = [
        LoanTerm::Months12,
        LoanTerm::Months24,
        LoanTerm::Months36,
        LoanTerm::Months48,
        LoanTerm::Months60,
    ];

    pub fn months(&self) -> u32 {
        match self {
            LoanTerm::Months12 => 12,
            LoanTerm::Months24 => 24,
            LoanTerm::Months36 => 36,
            LoanTerm::Months48 => 48,
            LoanTerm::Months60 => 60,
        }
    }
}

impl TryFrom<u32> for LoanTerm {
    type Error = RiskEngineError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        LoanTerm::ALL
            .iter()
            .copied()
            .find(|term| term.months() == months)
            .ok_or_else(|| RiskEngineError::UnsupportedCategory {
                table: "loan term".into(),
                value: format!("{months} months"),
            })
    }
}

impl From<LoanTerm> for u32 {
    fn from(term: LoanTerm) -> Self {
        term.months()
    }
}

impl fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.months())
    }
}

impl FromStr for LoanTerm {
    type Err = RiskEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months: u32 = s.trim().parse().map_err(|_| RiskEngineError::InvalidInput {
            field: "term".into(),
            reason: format!("'{s}' is not a whole number of months"),
        })?;
        LoanTerm::try_from(months)
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// A single retail loan request as submitted by the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Gross annual income
    pub income: Money,
    /// Requested principal
    pub loan_amount: Money,
    /// Bureau-style credit score, 300 to 850
    pub credit_score: u32,
    pub employment: EmploymentStatus,
    /// Amortisation term in months
    #[serde(alias = "term_months")]
    pub term: LoanTerm,
}

/// Reject applications that would make the pipeline meaningless
/// (zero income divides the DTI ratio) before any scoring starts.
pub fn validate_application(app: &LoanApplication) -> RiskEngineResult<()> {
    if app.income <= Decimal::ZERO {
        return Err(RiskEngineError::InvalidInput {
            field: "income".into(),
            reason: "Annual income must be positive".into(),
        });
    }
    if app.loan_amount <= Decimal::ZERO {
        return Err(RiskEngineError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    for (field, amount) in [("income", app.income), ("loan_amount", app.loan_amount)] {
        if amount > MAX_AMOUNT {
            return Err(RiskEngineError::InvalidInput {
                field: field.into(),
                reason: format!("Must not exceed {MAX_AMOUNT}"),
            });
        }
    }
    if app.credit_score < MIN_CREDIT_SCORE || app.credit_score > MAX_CREDIT_SCORE {
        return Err(RiskEngineError::InvalidInput {
            field: "credit_score".into(),
            reason: format!(
                "Credit score must be between {MIN_CREDIT_SCORE} and {MAX_CREDIT_SCORE}, got {}",
                app.credit_score
            ),
        });
    }
    Ok(())
}
