mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::credit::ApplicationArgs;
use commands::portfolio::PortfolioRiskArgs;
use logging::LogFormat;

/// Credit and portfolio risk scoring
#[derive(Parser)]
#[command(
    name = "riskx",
    version,
    about = "Credit and portfolio risk scoring",
    long_about = "Deterministic retail credit scoring (risk score, PD, expected loss, RWA, \
                  approval decision) and parametric portfolio VaR/CVaR with decimal \
                  precision. Portfolio prices come from a stock price service or a \
                  JSON snapshot."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log format (overrides config)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a loan application and decide approval
    CreditAssess(ApplicationArgs),
    /// Re-score an application under an income and credit score shock
    CreditStress(ApplicationArgs),
    /// Portfolio VaR, CVaR and volatility for a set of holdings
    PortfolioRisk(PortfolioRiskArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    if let Err(e) = logging::init_logging(&config.logging, cli.log_format) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::CreditAssess(args) => commands::credit::run_credit_assess(args),
        Commands::CreditStress(args) => commands::credit::run_credit_stress(args),
        Commands::PortfolioRisk(args) => {
            commands::portfolio::run_portfolio_risk(args, &config.market_data).await
        }
        Commands::Version => {
            println!("riskx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
