//! Error types for validation calls
//!
//! `ValidationError` is what a validator returns when it couldn't produce a
//! report at all. `InconsistencyError` describes a report whose success signal
//! contradicts its issues; validators attach it to the report instead of
//! failing, so the caller keeps the parsed data.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InconsistencyError {
    #[error("got neither errors nor success message")]
    NeitherErrorsNorSuccess,

    #[error("got both errors and success message")]
    BothErrorsAndSuccess,

    #[error("{program} reported pass but exited with status {exit_code}")]
    PassedWithFailingExit { program: String, exit_code: i32 },
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Request to {url} failed: {message}")]
    TransportFailure { url: String, message: String },

    #[error("Executable '{program}' not found in PATH")]
    ExecutableNotFound { program: String },

    #[error("Failed to run '{program}': {message}")]
    ProcessLaunchFailure { program: String, message: String },

    #[error("Failed to parse response: {message}")]
    ResponseParseFailure { message: String },

    #[error("Inconsistent validation result: {0}")]
    Inconsistent(#[from] InconsistencyError),

    #[error("Validation cancelled")]
    Cancelled,
}

impl ValidationError {
    pub fn transport(url: &str, message: impl ToString) -> Self {
        Self::TransportFailure {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn launch(program: &str, message: impl ToString) -> Self {
        Self::ProcessLaunchFailure {
            program: program.to_string(),
            message: message.to_string(),
        }
    }

    pub fn parse(message: impl ToString) -> Self {
        Self::ResponseParseFailure {
            message: message.to_string(),
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Nothing in this crate retries; this is for callers that do.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::TransportFailure { .. } => true,
            Self::ExecutableNotFound { .. } => false,
            Self::ProcessLaunchFailure { .. } => true,
            Self::ResponseParseFailure { .. } => false,
            Self::Inconsistent(_) => false,
            Self::Cancelled => false,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_exit_message_names_program_and_status() {
        let err = InconsistencyError::PassedWithFailingExit {
            program: "amphtml-validator".into(),
            exit_code: 1,
        };
        assert_eq!(
            err.to_string(),
            "amphtml-validator reported pass but exited with status 1"
        );
    }

    #[test]
    fn inconsistency_converts_into_validation_error() {
        let err: ValidationError = InconsistencyError::BothErrorsAndSuccess.into();
        assert_eq!(
            err.to_string(),
            "Inconsistent validation result: got both errors and success message"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_failures_are_retryable() {
        assert!(ValidationError::transport("https://example.org", "timed out").is_retryable());
        assert!(
            !ValidationError::ExecutableNotFound {
                program: "amphtml-validator".into()
            }
            .is_retryable()
        );
    }
}
