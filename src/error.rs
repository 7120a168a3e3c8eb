//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can abort a payroll calculation. Missing
//! compensation or contribution profiles are deliberately absent here:
//! they degrade the result but never fail it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calculation::PipelineStage;
use crate::providers::ProviderError;

/// Broad category of a [`CalculationError`].
///
/// Callers that only need to decide between "fix the request", "record is
/// missing" and "infrastructure failed" can branch on this instead of
/// matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself was malformed.
    InvalidInput,
    /// A required employee or position does not exist.
    NotFound,
    /// A record provider failed.
    ProviderFailure,
    /// A provider returned a record that violates its own invariants.
    InvalidRecord,
    /// The assembled payroll failed its final checks.
    ValidationFailure,
    /// Configuration could not be loaded.
    Configuration,
    /// A batch worker stopped before producing a result.
    Worker,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::CalculationError;
///
/// let error = CalculationError::EmployeeNotFound { employee_id: 42 };
/// assert_eq!(error.to_string(), "Employee not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum CalculationError {
    /// The request was rejected before any record was read.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending request field.
        field: String,
        /// What made the field invalid.
        message: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: i64,
    },

    /// The employee's position could not be resolved.
    #[error("Position {position_id} not found for employee {employee_id}")]
    PositionNotFound {
        /// The position id referenced by the employee.
        position_id: i64,
        /// The employee that references it.
        employee_id: i64,
    },

    /// The position carries a salary the engine cannot derive rates from.
    #[error("Invalid position {position_id}: {message}")]
    InvalidPosition {
        /// The position id.
        position_id: i64,
        /// Why the position is unusable.
        message: String,
    },

    /// A record provider call failed.
    #[error("{provider} provider failed: {source}")]
    ProviderFailure {
        /// Name of the provider that failed (e.g. "attendance").
        provider: &'static str,
        /// The underlying provider error.
        #[source]
        source: ProviderError,
    },

    /// A provider returned a record that breaks its invariants.
    #[error("Invalid {record} record on {date}: {message}")]
    InvalidRecord {
        /// The record kind (e.g. "attendance").
        record: &'static str,
        /// The date the record refers to.
        date: NaiveDate,
        /// What is wrong with it.
        message: String,
    },

    /// The assembled payroll failed validation and was discarded.
    #[error("Payroll validation failed at {stage}: {message}")]
    ValidationFailure {
        /// The stage the pipeline had reached.
        stage: PipelineStage,
        /// The failed check.
        message: String,
    },

    /// A batch worker panicked or was cancelled.
    #[error("Batch worker for employee {employee_id} failed: {message}")]
    WorkerFailed {
        /// The employee the worker was calculating.
        employee_id: i64,
        /// The join error reported by the runtime.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or is inconsistent.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl CalculationError {
    /// Returns the taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalculationError::InvalidInput { .. } => ErrorKind::InvalidInput,
            CalculationError::EmployeeNotFound { .. }
            | CalculationError::PositionNotFound { .. } => ErrorKind::NotFound,
            // A negative salary is bad master data, not a bad request.
            CalculationError::InvalidPosition { .. } | CalculationError::InvalidRecord { .. } => {
                ErrorKind::InvalidRecord
            }
            CalculationError::ProviderFailure { .. } => ErrorKind::ProviderFailure,
            CalculationError::ValidationFailure { .. } => ErrorKind::ValidationFailure,
            CalculationError::ConfigNotFound { .. } | CalculationError::ConfigParseError { .. } => {
                ErrorKind::Configuration
            }
            CalculationError::WorkerFailed { .. } => ErrorKind::Worker,
        }
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        CalculationError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn provider(provider: &'static str) -> impl FnOnce(ProviderError) -> Self {
        move |source| CalculationError::ProviderFailure { provider, source }
    }
}

/// A type alias for Results that return CalculationError.
pub type CalculationResult<T> = Result<T, CalculationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = CalculationError::invalid_input("employee_id", "must be positive");
        assert_eq!(
            error.to_string(),
            "Invalid input 'employee_id': must be positive"
        );
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_position_not_found_displays_both_ids() {
        let error = CalculationError::PositionNotFound {
            position_id: 7,
            employee_id: 3,
        };
        assert_eq!(error.to_string(), "Position 7 not found for employee 3");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_provider_failure_keeps_source() {
        let error = CalculationError::provider("attendance")(ProviderError::Unavailable {
            message: "connection reset".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "attendance provider failed: provider unavailable: connection reset"
        );
        assert!(error.source().is_some());
        assert_eq!(error.kind(), ErrorKind::ProviderFailure);
    }

    #[test]
    fn test_invalid_record_displays_date() {
        let error = CalculationError::InvalidRecord {
            record: "attendance",
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            message: "logout before login".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid attendance record on 2024-06-03: logout before login"
        );
    }

    #[test]
    fn test_validation_failure_displays_stage() {
        let error = CalculationError::ValidationFailure {
            stage: PipelineStage::Assembled,
            message: "gross pay is negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll validation failed at assembled: gross pay is negative"
        );
        assert_eq!(error.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_config_errors_are_configuration_kind() {
        let error = CalculationError::ConfigNotFound {
            path: "/missing/statutory.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/statutory.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CalculationError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn fails() -> CalculationResult<()> {
            Err(CalculationError::EmployeeNotFound { employee_id: 1 })
        }

        fn propagates() -> CalculationResult<()> {
            fails()?;
            Ok(())
        }

        assert!(matches!(
            propagates(),
            Err(CalculationError::EmployeeNotFound { employee_id: 1 })
        ));
    }
}
