//! Domain module - issues and validation results
//!
//! Plain value types shared by every validator path. Nothing in here talks to
//! the network or spawns processes.

pub mod issue;
pub mod report;

pub use issue::{Issue, Severity};
pub use report::{AmpReport, DocumentKind, STDIN_DOCUMENT, ValidationReport};
