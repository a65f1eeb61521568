//! Results returned by a validation call

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::issue::Issue;
use crate::infrastructure::validation_error::{InconsistencyError, ValidationError};

/// Identifier `amphtml-validator` uses for a document read from stdin
pub const STDIN_DOCUMENT: &str = "-";

/// Declared type of a document submitted to the CSS validator.
///
/// The CSS service reports success for anything it can't interpret under the
/// declared type, so there is deliberately no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A standalone stylesheet
    Stylesheet,
    /// An HTML document with embedded or inline CSS
    HtmlDocument,
}

impl DocumentKind {
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Stylesheet => "text/css",
            Self::HtmlDocument => "text/html",
        }
    }
}

/// Issues parsed from a web service's result page plus the page itself
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Issues in the order the service listed them
    pub issues: Vec<Issue>,
    /// Raw HTML page returned by the service
    pub raw_response: Vec<u8>,
    /// Set when the page's success marker disagrees with the parsed issues,
    /// which usually means the service changed its markup
    pub inconsistency: Option<InconsistencyError>,
}

impl ValidationReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.inconsistency.is_none()
    }

    /// Turns a recorded inconsistency into an error, discarding the report
    pub fn ensure_consistent(self) -> Result<Self, ValidationError> {
        match self.inconsistency {
            Some(inconsistency) => Err(ValidationError::Inconsistent(inconsistency)),
            None => Ok(self),
        }
    }
}

/// Issues reported by `amphtml-validator`, keyed by input file
#[derive(Debug, Clone, Default)]
pub struct AmpReport {
    /// Keyed by the path passed to the tool, or [`STDIN_DOCUMENT`]
    pub issues_by_path: BTreeMap<String, Vec<Issue>>,
    pub inconsistency: Option<InconsistencyError>,
}

impl AmpReport {
    /// All issues, grouped by path in key order
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues_by_path.values().flatten()
    }

    /// Issues for a document that was piped in on stdin
    #[must_use]
    pub fn stdin_issues(&self) -> &[Issue] {
        self.issues_for(STDIN_DOCUMENT)
    }

    #[must_use]
    pub fn issues_for(&self, path: &str) -> &[Issue] {
        self.issues_by_path.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.inconsistency.is_none()
    }

    pub fn ensure_consistent(self) -> Result<Self, ValidationError> {
        match self.inconsistency {
            Some(inconsistency) => Err(ValidationError::Inconsistent(inconsistency)),
            None => Ok(self),
        }
    }
}
