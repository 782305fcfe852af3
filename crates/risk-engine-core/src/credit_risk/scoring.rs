//! Classification tables for the four scoring factors.
//!
//! Each table is an ordered slice of records scanned in declared order:
//! 1. **Credit score** -- bands by minimum score, descending.
//! 2. **Income ratio** -- bands by maximum debt-to-income, ascending.
//! 3. **Employment** -- keyed by employment status.
//! 4. **Term** -- keyed by term length in months.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::application::{EmploymentStatus, LoanApplication, LoanTerm};
use crate::error::RiskEngineError;
use crate::types::Rate;
use crate::RiskEngineResult;

pub const CREDIT_SCORE_WEIGHT: Decimal = dec!(0.3);
pub const INCOME_RATIO_WEIGHT: Decimal = dec!(0.25);
pub const EMPLOYMENT_WEIGHT: Decimal = dec!(0.2);
pub const TERM_WEIGHT: Decimal = dec!(0.15);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreCategory::Excellent => write!(f, "excellent"),
            ScoreCategory::Good => write!(f, "good"),
            ScoreCategory::Fair => write!(f, "fair"),
            ScoreCategory::Poor => write!(f, "poor"),
            ScoreCategory::VeryPoor => write!(f, "veryPoor"),
        }
    }
}

/// One scored factor. Score is 0-100, weight its share of the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub category: ScoreCategory,
    pub score: Decimal,
    pub weight: Decimal,
}

impl ScoreComponent {
    pub fn weighted(&self) -> Decimal {
        self.score * self.weight
    }
}

/// The four components behind a single credit decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub credit_score: ScoreComponent,
    pub income_ratio: ScoreComponent,
    pub employment: ScoreComponent,
    pub term: ScoreComponent,
}

impl ScoreComponents {
    /// Components in evaluation order, labelled for display.
    pub fn labelled(&self) -> [(&'static str, &ScoreComponent); 4] {
        [
            ("Credit Score", &self.credit_score),
            ("Income Ratio", &self.income_ratio),
            ("Employment", &self.employment),
            ("Loan Term", &self.term),
        ]
    }

    pub fn total_weight(&self) -> Decimal {
        self.labelled().iter().map(|(_, c)| c.weight).sum()
    }

    /// Sum of score x weight across all four components.
    pub fn weighted_score(&self) -> Decimal {
        self.labelled().iter().map(|(_, c)| c.weighted()).sum()
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

struct Band {
    threshold: Decimal,
    category: ScoreCategory,
    score: Decimal,
}

/// Minimum credit score per band, highest first.
const CREDIT_SCORE_BANDS: [Band; 5] = [
    Band { threshold: dec!(750), category: ScoreCategory::Excellent, score: dec!(100) },
    Band { threshold: dec!(700), category: ScoreCategory::Good, score: dec!(80) },
    Band { threshold: dec!(650), category: ScoreCategory::Fair, score: dec!(60) },
    Band { threshold: dec!(600), category: ScoreCategory::Poor, score: dec!(40) },
    Band { threshold: dec!(0), category: ScoreCategory::VeryPoor, score: dec!(20) },
];

/// Maximum debt-to-income ratio per band, lowest first.
const INCOME_RATIO_BANDS: [Band; 5] = [
    Band { threshold: dec!(0.2), category: ScoreCategory::Excellent, score: dec!(100) },
    Band { threshold: dec!(0.3), category: ScoreCategory::Good, score: dec!(80) },
    Band { threshold: dec!(0.4), category: ScoreCategory::Fair, score: dec!(60) },
    Band { threshold: dec!(0.5), category: ScoreCategory::Poor, score: dec!(40) },
    Band { threshold: dec!(1.0), category: ScoreCategory::VeryPoor, score: dec!(20) },
];

const EMPLOYMENT_SCORES: [(EmploymentStatus, Decimal); 6] = [
    (EmploymentStatus::FullTime, dec!(100)),
    (EmploymentStatus::PartTime, dec!(70)),
    (EmploymentStatus::SelfEmployed, dec!(80)),
    (EmploymentStatus::Contractor, dec!(60)),
    (EmploymentStatus::Unemployed, dec!(20)),
    (EmploymentStatus::Retired, dec!(90)),
];

const TERM_SCORES: [(u32, Decimal); 5] = [
    (12, dec!(100)),
    (24, dec!(90)),
    (36, dec!(80)),
    (48, dec!(70)),
    (60, dec!(60)),
];

const VERY_POOR_SCORE: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// First band whose minimum is at or below the score.
pub fn credit_score_component(credit_score: u32) -> ScoreComponent {
    let score = Decimal::from(credit_score);
    CREDIT_SCORE_BANDS
        .iter()
        .find(|band| score >= band.threshold)
        .map(|band| ScoreComponent {
            category: band.category,
            score: band.score,
            weight: CREDIT_SCORE_WEIGHT,
        })
        .unwrap_or(ScoreComponent {
            category: ScoreCategory::VeryPoor,
            score: VERY_POOR_SCORE,
            weight: CREDIT_SCORE_WEIGHT,
        })
}

/// First band whose maximum is at or above the ratio. DTI above 1.0
/// falls through to veryPoor.
pub fn income_ratio_component(debt_to_income: Rate) -> ScoreComponent {
    INCOME_RATIO_BANDS
        .iter()
        .find(|band| debt_to_income <= band.threshold)
        .map(|band| ScoreComponent {
            category: band.category,
            score: band.score,
            weight: INCOME_RATIO_WEIGHT,
        })
        .unwrap_or(ScoreComponent {
            category: ScoreCategory::VeryPoor,
            score: VERY_POOR_SCORE,
            weight: INCOME_RATIO_WEIGHT,
        })
}

pub fn employment_component(status: EmploymentStatus) -> RiskEngineResult<ScoreComponent> {
    let (_, score) = EMPLOYMENT_SCORES
        .iter()
        .find(|(s, _)| *s == status)
        .ok_or_else(|| RiskEngineError::UnsupportedCategory {
            table: "employment".into(),
            value: status.to_string(),
        })?;
    Ok(ScoreComponent {
        category: category_for_score(*score),
        score: *score,
        weight: EMPLOYMENT_WEIGHT,
    })
}

pub fn term_component(term: LoanTerm) -> RiskEngineResult<ScoreComponent> {
    let months = term.months();
    let (_, score) = TERM_SCORES
        .iter()
        .find(|(m, _)| *m == months)
        .ok_or_else(|| RiskEngineError::UnsupportedCategory {
            table: "loan term".into(),
            value: format!("{months} months"),
        })?;
    Ok(ScoreComponent {
        category: category_for_score(*score),
        score: *score,
        weight: TERM_WEIGHT,
    })
}

/// Category label for the keyed tables, using the credit band scores.
fn category_for_score(score: Decimal) -> ScoreCategory {
    if score >= dec!(100) {
        ScoreCategory::Excellent
    } else if score >= dec!(80) {
        ScoreCategory::Good
    } else if score >= dec!(60) {
        ScoreCategory::Fair
    } else if score >= dec!(40) {
        ScoreCategory::Poor
    } else {
        ScoreCategory::VeryPoor
    }
}

/// Score all four factors for an application at the given DTI.
pub fn score_components(
    app: &LoanApplication,
    debt_to_income: Rate,
) -> RiskEngineResult<ScoreComponents> {
    Ok(ScoreComponents {
        credit_score: credit_score_component(app.credit_score),
        income_ratio: income_ratio_component(debt_to_income),
        employment: employment_component(app.employment)?,
        term: term_component(app.term)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_score_band_edges() {
        assert_eq!(credit_score_component(850).category, ScoreCategory::Excellent);
        assert_eq!(credit_score_component(750).category, ScoreCategory::Excellent);
        assert_eq!(credit_score_component(749).category, ScoreCategory::Good);
        assert_eq!(credit_score_component(700).category, ScoreCategory::Good);
        assert_eq!(credit_score_component(650).category, ScoreCategory::Fair);
        assert_eq!(credit_score_component(600).category, ScoreCategory::Poor);
        assert_eq!(credit_score_component(599).category, ScoreCategory::VeryPoor);
        assert_eq!(credit_score_component(300).score, dec!(20));
    }

    #[test]
    fn test_credit_score_component_monotonic() {
        let mut previous = Decimal::ZERO;
        for score in 300..=850 {
            let component = credit_score_component(score);
            assert!(component.score >= previous, "score dropped at {score}");
            previous = component.score;
        }
    }

    #[test]
    fn test_income_ratio_band_edges() {
        assert_eq!(income_ratio_component(dec!(0.2)).category, ScoreCategory::Excellent);
        assert_eq!(income_ratio_component(dec!(0.2001)).category, ScoreCategory::Good);
        assert_eq!(income_ratio_component(dec!(0.4)).score, dec!(60));
        assert_eq!(income_ratio_component(dec!(0.45)).category, ScoreCategory::Poor);
        assert_eq!(income_ratio_component(dec!(1.0)).category, ScoreCategory::VeryPoor);
        assert_eq!(income_ratio_component(dec!(2.5)).score, dec!(20));
    }

    #[test]
    fn test_employment_scores() {
        let expected = [
            (EmploymentStatus::FullTime, dec!(100)),
            (EmploymentStatus::SelfEmployed, dec!(80)),
            (EmploymentStatus::Retired, dec!(90)),
            (EmploymentStatus::PartTime, dec!(70)),
            (EmploymentStatus::Contractor, dec!(60)),
            (EmploymentStatus::Unemployed, dec!(20)),
        ];
        for (status, score) in expected {
            let component = employment_component(status).unwrap();
            assert_eq!(component.score, score, "{status}");
            assert_eq!(component.weight, EMPLOYMENT_WEIGHT);
        }
        assert_eq!(
            employment_component(EmploymentStatus::Unemployed).unwrap().category,
            ScoreCategory::VeryPoor
        );
    }

    #[test]
    fn test_term_scores_decrease_with_length() {
        let scores: Vec<Decimal> = LoanTerm::ALL
            .iter()
            .map(|t| term_component(*t).unwrap().score)
            .collect();
        assert_eq!(scores, vec![dec!(100), dec!(90), dec!(80), dec!(70), dec!(60)]);
    }

    #[test]
    fn test_every_table_covers_its_domain() {
        for status in EmploymentStatus::ALL {
            assert!(employment_component(status).is_ok());
        }
        for term in LoanTerm::ALL {
            assert!(term_component(term).is_ok());
        }
    }
}
