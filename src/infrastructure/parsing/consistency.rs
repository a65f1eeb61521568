//! Cross-check between a service's own pass/fail signal and the issues we
//! managed to extract from its report.
//!
//! If the services change their markup the parsers silently find nothing; this
//! check turns that into a loud inconsistency instead of a false "valid".

use crate::domain::Issue;
use crate::infrastructure::validation_error::InconsistencyError;

/// Fails if `success` disagrees with the presence of error-severity issues.
/// Warnings are ignored.
pub fn check_response(success: bool, issues: &[Issue]) -> Result<(), InconsistencyError> {
    let got_error = issues.iter().any(Issue::is_error);

    match (success, got_error) {
        (false, false) => Err(InconsistencyError::NeitherErrorsNorSuccess),
        (true, true) => Err(InconsistencyError::BothErrorsAndSuccess),
        _ => Ok(()),
    }
}
