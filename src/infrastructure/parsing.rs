//! Result-page and JSON parsing for the external validators
//!
//! The W3C services answer with human-oriented HTML pages; `amphtml-validator`
//! prints JSON. Each parser turns one of those into `Issue`s and checks the
//! result against the service's own success signal.

pub mod amp_report_parser;
pub mod consistency;
pub mod css_report_parser;
pub mod html_report_parser;
pub mod tree;

pub use amp_report_parser::AmpReportParser;
pub use consistency::check_response;
pub use css_report_parser::CssReportParser;
pub use html_report_parser::HtmlReportParser;

use scraper::Html;
use tracing::{debug, warn};

use crate::domain::{Issue, ValidationReport};

/// Parser for an HTML result page returned by a validation web service
pub trait ResultPageParser {
    /// Literal text the service embeds in its page when the document passed
    const SUCCESS_MARKER: &'static str;

    /// Short service name used in log events
    const SERVICE: &'static str;

    /// Extracts issues in the order the page lists them
    fn extract_issues(&self, page: &Html) -> Vec<Issue>;

    /// Parses a raw response into a report.
    ///
    /// HTML parsing is error tolerant, so this never fails; a page we don't
    /// understand shows up as an inconsistency instead.
    fn parse_report(&self, raw_response: Vec<u8>) -> ValidationReport {
        let (issues, success) = {
            let body = String::from_utf8_lossy(&raw_response);
            let page = Html::parse_document(&body);
            (
                self.extract_issues(&page),
                body.contains(Self::SUCCESS_MARKER),
            )
        };

        debug!(
            "{} page: {} issue(s), success marker {}",
            Self::SERVICE,
            issues.len(),
            if success { "present" } else { "absent" }
        );

        let inconsistency = check_response(success, &issues).err();
        if let Some(inconsistency) = &inconsistency {
            warn!(
                "{} results page looks inconsistent ({}); its format may have changed",
                Self::SERVICE,
                inconsistency
            );
        }

        ValidationReport {
            issues,
            raw_response,
            inconsistency,
        }
    }
}
