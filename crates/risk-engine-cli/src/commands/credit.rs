use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use risk_engine_core::credit_risk::application::{EmploymentStatus, LoanApplication, LoanTerm};
use risk_engine_core::credit_risk::{assessment, stress};

use crate::input;

/// Loan application, from flags, a JSON file or piped JSON
#[derive(Args)]
pub struct ApplicationArgs {
    /// JSON input file, or `-` for stdin (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross annual income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Requested loan amount
    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,

    /// Credit score (300-850)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// full-time, part-time, self-employed, contractor, unemployed or retired
    #[arg(long)]
    pub employment: Option<EmploymentStatus>,

    /// Loan term in months: 12, 24, 36, 48 or 60
    #[arg(long, alias = "term-months")]
    pub term: Option<LoanTerm>,
}

fn resolve_application(args: ApplicationArgs) -> Result<LoanApplication, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::read_json(path);
    }
    if let Some(app) = input::read_piped()? {
        return Ok(app);
    }
    Ok(LoanApplication {
        income: args.income.ok_or("--income is required (or provide --input)")?,
        loan_amount: args
            .loan_amount
            .ok_or("--loan-amount is required (or provide --input)")?,
        credit_score: args
            .credit_score
            .ok_or("--credit-score is required (or provide --input)")?,
        employment: args
            .employment
            .ok_or("--employment is required (or provide --input)")?,
        term: args.term.ok_or("--term is required (or provide --input)")?,
    })
}

pub fn run_credit_assess(args: ApplicationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let app = resolve_application(args)?;
    tracing::debug!(
        credit_score = app.credit_score,
        term = app.term.months(),
        "Assessing application"
    );
    let result = assessment::assess_credit_risk(&app)?;
    tracing::info!(
        approved = result.result.decision.approved,
        risk_score = %result.result.metrics.risk_score,
        "Credit assessment complete"
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_credit_stress(args: ApplicationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let app = resolve_application(args)?;
    let result = stress::run_stress_test(&app)?;
    tracing::info!(
        base_approved = result.result.base.decision.approved,
        adverse_approved = result.result.adverse.decision.approved,
        "Stress test complete"
    );
    Ok(serde_json::to_value(result)?)
}
