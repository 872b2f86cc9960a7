// src/types/errors.rs - error types

use thiserror::Error;

use super::trading::TradeSide;

/// Errors raised at the market data fetch boundary
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error {code}: {msg}")]
    ApiError { code: String, msg: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Data parsing error: {0}")]
    DataParsingError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConnectorError::TimeoutError(err.to_string())
        } else if err.is_connect() {
            ConnectorError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            ConnectorError::DataParsingError(err.to_string())
        } else {
            ConnectorError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::DataParsingError(err.to_string())
    }
}

/// Errors raised while pricing against an order book
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("no liquidity on the {side} side of {inst_id}")]
    NoLiquidity { inst_id: String, side: TradeSide },

    #[error("invalid trade size {0}")]
    InvalidSize(String),

    #[error("arithmetic overflow while pricing {0}")]
    Overflow(String),
}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
