//! Position-level market data and portfolio VaR/CVaR aggregation.

pub mod aggregator;
pub mod position;
