use clap::Args;
use serde_json::Value;

use risk_engine_core::market_data::{
    holdings_from_lists, load_positions, Holding, HttpPriceSource, StaticPriceSource,
};
use risk_engine_core::portfolio_risk::aggregator::{calculate_portfolio_risk, PortfolioRiskInput};

use crate::config::MarketDataConfig;
use crate::input;

/// Arguments for portfolio VaR/CVaR
#[derive(Args)]
pub struct PortfolioRiskArgs {
    /// JSON list of {"symbol", "quantity"} holdings, or `-` for stdin
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated ticker symbols
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Comma-separated share counts, one per symbol
    #[arg(long, value_delimiter = ',')]
    pub quantities: Vec<u64>,

    /// Confidence level in percent: 90, 95 or 99
    #[arg(long, default_value_t = 99)]
    pub confidence: u32,

    /// VaR horizon in trading days
    #[arg(long, default_value_t = 1)]
    pub horizon: u32,

    /// Price snapshot JSON ({"quotes": ..., "forecasts": ...}) used
    /// instead of the price service, or `-` for stdin
    #[arg(long)]
    pub prices: Option<String>,

    /// Price service base URL (overrides config)
    #[arg(long)]
    pub price_url: Option<String>,
}

fn resolve_holdings(args: &PortfolioRiskArgs) -> Result<Vec<Holding>, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::read_json(path);
    }
    if args.symbols.is_empty() {
        return input::read_piped()?
            .ok_or_else(|| "--symbols and --quantities are required (or provide --input)".into());
    }
    Ok(holdings_from_lists(&args.symbols, &args.quantities)?)
}

pub async fn run_portfolio_risk(
    args: PortfolioRiskArgs,
    config: &MarketDataConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let holdings = resolve_holdings(&args)?;

    let positions = match args.prices {
        Some(ref path) => {
            let source: StaticPriceSource = input::read_json(path)?;
            load_positions(&source, &holdings, config.timeout()).await?
        }
        None => {
            let mut http = config.http_source_config();
            if let Some(ref url) = args.price_url {
                http.base_url = url.clone();
            }
            tracing::debug!(base_url = %http.base_url, "Using price service");
            let source = HttpPriceSource::with_config(http)?;
            load_positions(&source, &holdings, config.timeout()).await?
        }
    };

    let risk_input = PortfolioRiskInput {
        positions,
        confidence_level: args.confidence,
        horizon_days: args.horizon,
    };
    let result = calculate_portfolio_risk(&risk_input)?;

    tracing::info!(
        total_value = %result.result.total_value,
        value_at_risk = %result.result.value_at_risk,
        "Portfolio risk complete"
    );
    Ok(serde_json::to_value(result)?)
}
