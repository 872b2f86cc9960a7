// src/connectors/common/mod.rs - helpers shared by connectors

pub mod orderbook_validator;

pub use orderbook_validator::{
    OrderbookStats,
    OrderbookValidator,
    OrderbookValidatorConfig,
    ValidationError,
    ValidationErrorType,
    ValidationResult,
    ValidationWarning,
    ValidationWarningType,
};
