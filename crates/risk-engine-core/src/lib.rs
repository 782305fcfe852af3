pub mod error;
pub mod types;

#[cfg(feature = "credit_risk")]
pub mod credit_risk;

#[cfg(feature = "portfolio_risk")]
pub mod portfolio_risk;

#[cfg(feature = "market_data")]
pub mod market_data;

pub use error::RiskEngineError;
pub use types::*;

/// Standard result type for all risk-engine operations
pub type RiskEngineResult<T> = Result<T, RiskEngineError>;
