//! Parser for W3C CSS Validation Service result pages
//!
//! Errors look like this:
//!
//! ```html
//! <tr class="error">
//!   <td class="linenumber" title="Line 17">17</td>
//!   <td class="codeContext"> body </td>
//!   <td class="parse-error">Property <code>invalid-property</code> doesn't exist : #aaa</td>
//! </tr>
//! ```
//!
//! Warnings use `<tr class="warning">` and a `level0`..`level2` message cell.

use scraper::{ElementRef, Html};

use super::ResultPageParser;
use super::tree::{attr, find_all, parse_position, text};
use crate::domain::{Issue, Severity};

/// Comment included in CSS validator results pages on success
pub const CSS_SUCCESS_MARKER: &str = "<!-- NO ERRORS -->";

#[derive(Debug, Clone, Copy, Default)]
pub struct CssReportParser;

impl CssReportParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds an issue from one result row. The service doesn't report
    /// columns, so `column` stays unknown.
    fn make_issue(row: ElementRef<'_>, severity: Severity) -> Issue {
        let mut issue = Issue::new(severity, "");

        let cells = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td");

        for cell in cells {
            let content = text(cell, None);
            let content = content.trim();
            if content.is_empty() {
                continue;
            }

            match attr(cell, "class") {
                "linenumber" => issue.line = parse_position(content, "line"),
                "codeContext" => issue.context = content.to_string(),
                _ => issue.message = content.to_string(),
            }
        }
        issue
    }
}

impl ResultPageParser for CssReportParser {
    const SUCCESS_MARKER: &'static str = CSS_SUCCESS_MARKER;
    const SERVICE: &'static str = "CSS Validation Service";

    fn extract_issues(&self, page: &Html) -> Vec<Issue> {
        find_all(page.root_element(), &|e| row_severity(e).is_some())
            .into_iter()
            .filter_map(|row| row_severity(row).map(|severity| Self::make_issue(row, severity)))
            .collect()
    }
}

fn row_severity(element: ElementRef<'_>) -> Option<Severity> {
    if element.value().name() != "tr" {
        return None;
    }
    match attr(element, "class") {
        "error" => Some(Severity::Error),
        "warning" => Some(Severity::Warning),
        _ => None,
    }
}
