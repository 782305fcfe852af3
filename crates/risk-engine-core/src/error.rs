use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskEngineError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unsupported {table} value: {value}")]
    UnsupportedCategory { table: String, value: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RiskEngineError {
    fn from(e: serde_json::Error) -> Self {
        RiskEngineError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "market_data")]
impl From<reqwest::Error> for RiskEngineError {
    fn from(e: reqwest::Error) -> Self {
        RiskEngineError::DataSource(e.to_string())
    }
}
