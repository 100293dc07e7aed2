//! Error types for the survey analytics core.
//!
//! The aggregation engine itself never fails. Errors originate from
//! input validation done by callers, the access collaborator, and the
//! final spreadsheet encoding step.

use thiserror::Error;

/// Errors raised by the survey analytics crate.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// Input rejected while validating upstream of the core.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The spreadsheet encoder could not produce output.
    #[error("failed to encode export document: {0}")]
    ExportEncoding(#[from] rust_xlsxwriter::XlsxError),

    /// The viewer is not permitted to see analytics.
    #[error("access denied for viewer: {0}")]
    AccessDenied(String),
}

impl SurveyError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SurveyError::AccessDenied(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SurveyError::InvalidInput("catalog is empty".to_string());
        assert_eq!(err.to_string(), "invalid input: catalog is empty");

        let err = SurveyError::AccessDenied("someone@example.com".to_string());
        assert!(err.to_string().contains("someone@example.com"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(SurveyError::InvalidInput(String::new()).exit_code(), 1);
        assert_eq!(SurveyError::AccessDenied(String::new()).exit_code(), 3);
    }
}
