//! Unified error hierarchy for liftrs
//!
//! Insufficient history is never an error: every analyzer has a defined
//! default for sparse data. Errors are reserved for malformed input and bad
//! configuration.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error type for all liftrs operations
#[derive(Debug, Error)]
pub enum LiftRsError {
    /// Malformed engine input
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Malformed input shapes rejected before any computation
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// An identifier that must be present was empty
    #[error("Missing identifier: {field}")]
    MissingIdentifier { field: String },

    /// Weight below zero
    #[error("Negative weight {weight} in {context}")]
    NegativeWeight { context: String, weight: Decimal },

    /// Weight beyond any plausible load
    #[error("Weight {weight} in {context} exceeds the {max} limit")]
    ExcessiveWeight {
        context: String,
        weight: Decimal,
        max: Decimal,
    },

    /// Numeric value outside its accepted range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Sleep duration that is not a plausible number of hours
    #[error("Invalid sleep hours: {hours}")]
    InvalidSleepHours { hours: f64 },

    /// Set numbers are 1-based
    #[error("Set number must be at least 1, got {set_number}")]
    InvalidSetNumber { set_number: u32 },

    /// Rep targets must be positive
    #[error("Target reps must be at least 1, got {reps}")]
    InvalidTargetReps { reps: u32 },
}

/// Result type alias for liftrs operations
pub type Result<T> = std::result::Result<T, LiftRsError>;

impl LiftRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftRsError::InvalidInput(InputError::InvalidSleepHours { .. }) => {
                ErrorSeverity::Warning
            }
            LiftRsError::InvalidInput(_) => ErrorSeverity::Error,
            LiftRsError::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftRsError::InvalidInput(InputError::OutOfRange { field, min, max, .. }) => {
                format!("Please keep {} between {} and {}.", field, min, max)
            }
            LiftRsError::InvalidInput(InputError::NegativeWeight { context, .. }) => {
                format!("A logged weight in {} is negative. Please correct the workout.", context)
            }
            LiftRsError::InvalidInput(InputError::ExcessiveWeight { context, max, .. }) => {
                format!(
                    "A logged weight in {} is above {}. Please correct the workout.",
                    context, max
                )
            }
            LiftRsError::Configuration(reason) => {
                format!("The configuration file is invalid: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
