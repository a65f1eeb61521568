//! Parser for `amphtml-validator --format=json` output
//!
//! The tool prints one object keyed by input file (or `-` for stdin):
//!
//! ```json
//! {"-": {"status": "FAIL", "errors": [{"severity": "ERROR", "line": 2, "col": 0,
//!        "message": "The mandatory attribute '⚡' is missing in tag 'html'.",
//!        "code": 5, "specUrl": "https://amp.dev/..."}]}}
//! ```
//!
//! Around May 2021 `code` changed from a symbolic string to a number, and
//! either may still be seen depending on the installed version.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::{debug, warn};

use super::check_response;
use crate::domain::{AmpReport, Issue, Severity};
use crate::infrastructure::process_runner::ProcessOutput;
use crate::infrastructure::validation_error::{
    InconsistencyError, ValidationError, ValidationResult,
};

/// Subset of `ValidationResult` from the AMP validator's `validator.proto`
#[derive(Debug, Deserialize)]
struct FileResult {
    /// UNKNOWN, PASS or FAIL
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<RawError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawError {
    /// UNKNOWN_SEVERITY, ERROR or WARNING
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    line: Option<i64>,
    /// 0-indexed
    #[serde(default)]
    col: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: ErrorCode,
    #[serde(default)]
    spec_url: Option<String>,
}

/// The `code` field in either of its historical encodings
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum ErrorCode {
    Symbolic(String),
    Numeric(i64),
    #[default]
    Missing,
    Unrecognized(IgnoredAny),
}

impl ErrorCode {
    fn into_text(self) -> String {
        match self {
            Self::Symbolic(code) => code,
            Self::Numeric(code) => code.to_string(),
            Self::Missing | Self::Unrecognized(_) => String::new(),
        }
    }
}

impl RawError {
    fn into_issue(self) -> Issue {
        let severity = match self.severity.as_deref() {
            Some("WARNING") => Severity::Warning,
            _ => Severity::Error,
        };
        Issue {
            severity,
            line: self.line.and_then(|line| u32::try_from(line).ok()).unwrap_or(0),
            column: self
                .col
                .and_then(|col| col.checked_add(1))
                .and_then(|col| u32::try_from(col).ok())
                .unwrap_or(0),
            message: self.message.unwrap_or_default(),
            context: String::new(),
            code: self.code.into_text(),
            url: self.spec_url.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AmpReportParser {
    program: String,
}

impl AmpReportParser {
    /// `program` is only used to name the tool in inconsistency reports
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Parses the output of one `amphtml-validator` run.
    ///
    /// Malformed JSON is an error. A pass/fail disagreement is recorded on
    /// the returned report.
    pub fn parse_output(&self, output: &ProcessOutput) -> ValidationResult<AmpReport> {
        let results: BTreeMap<String, FileResult> = serde_json::from_slice(&output.stdout)
            .map_err(|e| ValidationError::parse(format!("{} output: {e}", self.program)))?;

        let mut all_passed = true;
        let mut issues_by_path = BTreeMap::new();
        for (path, result) in results {
            if result.status.as_deref() != Some("PASS") {
                all_passed = false;
            }
            let issues: Vec<Issue> = result.errors.into_iter().map(RawError::into_issue).collect();
            debug!("{}: {} issue(s)", path, issues.len());
            issues_by_path.insert(path, issues);
        }

        let mut report = AmpReport {
            issues_by_path,
            inconsistency: None,
        };

        report.inconsistency = if all_passed && !output.success() {
            Some(InconsistencyError::PassedWithFailingExit {
                program: self.program.clone(),
                exit_code: output.exit_code,
            })
        } else {
            let all_issues: Vec<Issue> = report.issues().cloned().collect();
            check_response(all_passed, &all_issues).err()
        };

        if let Some(inconsistency) = &report.inconsistency {
            warn!("Inconsistent {} result: {}", self.program, inconsistency);
        }
        Ok(report)
    }
}
