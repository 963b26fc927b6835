//! Error types for the TraduPay engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading reference tables
//! or calculating net income.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the TraduPay engine.
///
/// Errors fall into two groups: operator errors (broken or missing reference
/// data, fatal at load time) and caller errors (bad request input, reported
/// back as a rejected request). See [`EngineError::is_caller_error`].
///
/// # Example
///
/// ```
/// use tradupay_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A tax table does not partition [0, ∞) into well-formed brackets.
    #[error("Malformed tax table '{table}': {message}")]
    MalformedTable {
        /// The name of the offending table.
        table: String,
        /// What is wrong with the table.
        message: String,
    },

    /// No table set is effective on the requested date.
    #[error("No tax tables effective on {date}")]
    TableSetNotFound {
        /// The date for which tables were requested.
        date: NaiveDate,
    },

    /// A gross amount (or any amount fed to a table) was negative.
    #[error("Negative amount for '{field}': {amount}")]
    NegativeGross {
        /// The input field carrying the amount.
        field: String,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A ratio was outside the closed interval [0, 1].
    #[error("Ratio '{field}' must be between 0 and 1, got {value}")]
    InvalidRatio {
        /// The input field carrying the ratio.
        field: String,
        /// The rejected value.
        value: Decimal,
    },

    /// A request was structurally valid but semantically unusable.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable, machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::MalformedTable { .. } => "MALFORMED_TABLE",
            EngineError::TableSetNotFound { .. } => "TABLE_SET_NOT_FOUND",
            EngineError::NegativeGross { .. } => "NEGATIVE_GROSS",
            EngineError::InvalidRatio { .. } => "INVALID_RATIO",
            EngineError::InvalidInput { .. } => "VALIDATION_ERROR",
            EngineError::CalculationError { .. } => "CALCULATION_ERROR",
        }
    }

    /// Returns true if the error was caused by caller input rather than by
    /// the engine's reference data.
    ///
    /// Caller errors are recoverable: the request is rejected and the caller
    /// is expected to fix its input. Everything else is an operator fault.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EngineError::NegativeGross { .. }
                | EngineError::InvalidRatio { .. }
                | EngineError::InvalidInput { .. }
                | EngineError::TableSetNotFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
