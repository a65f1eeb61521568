//! page-validate - client for external document validators
//!
//! Submits HTML and CSS documents to the W3C Nu Html Checker and CSS
//! Validation Service, and AMP HTML documents to a local `amphtml-validator`,
//! then turns their result pages or JSON output into a list of [`Issue`]s.
//!
//! The services' result pages are meant for people, so every parse is also
//! checked against the page's own success marker. A disagreement means the
//! markup probably changed, and is reported as an [`InconsistencyError`]
//! on the returned report.

pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

pub use application::{AmpValidator, CssValidator, HtmlValidator, render_amp_results_page};
pub use domain::{AmpReport, DocumentKind, Issue, STDIN_DOCUMENT, Severity, ValidationReport};
pub use infrastructure::{
    InconsistencyError, ValidationError, ValidationResult, ValidatorConfig,
};
