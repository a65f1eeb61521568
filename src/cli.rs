//! CLI argument parsing via `clap`.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "validate-page",
    version,
    about = "Validate an HTML, CSS or AMP HTML document",
    long_about = "Validate an HTML, CSS or AMP HTML document.\n\nHTML and CSS are checked by the W3C web services; AMP HTML needs amphtml-validator on PATH.\nIf FILE isn't supplied, the document is read from stdin.",
    after_help = "Examples:\n  validate-page index.html\n  validate-page --type htmlcss index.html\n  validate-page --output results.html style.css\n  cat story.amp.html | validate-page --type amp"
)]
pub struct Cli {
    #[arg(long = "type", value_enum, help = "Document type (inferred from FILE's extension if omitted)")]
    pub file_type: Option<FileType>,
    #[arg(long, short, value_name = "FILE", help = "Write the validator's results page to FILE")]
    pub output: Option<PathBuf>,
    #[arg(long, value_name = "FILE", help = "Config file (default: <config dir>/page-validate/config.toml)")]
    pub config: Option<PathBuf>,
    #[arg(long, value_name = "LEVEL", help = "Log level or filter directive, e.g. debug")]
    pub log_level: Option<String>,
    #[arg(value_name = "FILE", help = "Document to validate")]
    pub file: Option<PathBuf>,
}

/// What to validate and with which authority
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// AMP HTML, via amphtml-validator
    Amp,
    /// Stylesheet, via the CSS Validation Service
    Css,
    /// HTML, via the Nu Html Checker
    Html,
    /// CSS inside an HTML document, via the CSS Validation Service
    Htmlcss,
}

impl FileType {
    /// Guesses the type from the file name; content is never inspected
    pub fn infer(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".amp") || name.ends_with(".amp.html") {
            Some(Self::Amp)
        } else if name.ends_with(".css") {
            Some(Self::Css)
        } else if name.ends_with(".html") || name.ends_with(".htm") {
            Some(Self::Html)
        } else {
            None
        }
    }
}
