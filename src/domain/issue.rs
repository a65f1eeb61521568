//! Issues reported by the external validators
//!
//! Every validator path produces the same `Issue` value, whatever the wire
//! format of the service it talked to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seriousness of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// An actual problem, e.g. an unclosed tag or an unknown CSS property
    Error,
    /// A minor problem, e.g. a vendor-prefixed CSS property
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem reported by a validator.
///
/// `line` and `column` use 0 for "unknown". Lines are 1-indexed. The CSS
/// service never reports a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    /// Whitespace-normalized description; may span several lines
    pub message: String,
    /// Excerpt of the offending source, empty if the service didn't send one
    pub context: String,
    /// Machine-readable code (AMP only).
    ///
    /// `amphtml-validator` has emitted this both as a symbolic string
    /// (`"MANDATORY_ATTR_MISSING"`) and as a number (`5`); either form is
    /// stored as text. Empty when absent or undecodable.
    pub code: String,
    /// Documentation URL for the issue (AMP only)
    pub url: String,
}

impl Issue {
    /// Creates an issue with no location, context, code or URL
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            line: 0,
            column: 0,
            message: message.into(),
            context: String::new(),
            code: String::new(),
            url: String::new(),
        }
    }

    #[must_use]
    pub const fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}: {}",
            self.line, self.column, self.severity, self.message
        )?;
        if !self.context.is_empty() {
            write!(f, " ({})", self.context)?;
        }
        Ok(())
    }
}
