//! AMP HTML validation through a locally installed `amphtml-validator`
//!
//! No public web service accepts posted AMP documents, so this path needs
//! the Node.js tool on `PATH`. The tool is slow to start, so prefer
//! `validate_files` over repeated `validate` calls when checking many pages.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::AmpReport;
use crate::infrastructure::config::AmpConfig;
use crate::infrastructure::parsing::AmpReportParser;
use crate::infrastructure::process_runner::CommandRunner;
use crate::infrastructure::validation_error::{ValidationError, ValidationResult};

const FORMAT_ARG: &str = "--format=json";

pub struct AmpValidator<R: CommandRunner> {
    runner: Arc<R>,
    executable: String,
    parser: AmpReportParser,
}

impl<R: CommandRunner> AmpValidator<R> {
    pub fn new(runner: Arc<R>, executable: impl Into<String>) -> Self {
        let executable = executable.into();
        Self {
            runner,
            parser: AmpReportParser::new(executable.clone()),
            executable,
        }
    }

    pub fn from_config(runner: Arc<R>, config: &AmpConfig) -> Self {
        Self::new(runner, config.executable.clone())
    }

    /// Validates a single document fed on stdin.
    ///
    /// Its issues are under [`crate::domain::STDIN_DOCUMENT`]; see
    /// [`AmpReport::stdin_issues`].
    pub async fn validate(
        &self,
        document: &[u8],
        cancel: &CancellationToken,
    ) -> ValidationResult<AmpReport> {
        let args = vec![FORMAT_ARG.to_string(), "-".to_string()];
        self.run(args, Some(document.to_vec()), cancel).await
    }

    /// Validates files in one run of the tool, keyed by the paths as given
    pub async fn validate_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        cancel: &CancellationToken,
    ) -> ValidationResult<AmpReport> {
        if paths.is_empty() {
            return Ok(AmpReport::default());
        }

        let args = std::iter::once(FORMAT_ARG.to_string())
            .chain(paths.iter().map(|p| p.as_ref().to_string_lossy().into_owned()))
            .collect();
        self.run(args, None, cancel).await
    }

    async fn run(
        &self,
        args: Vec<String>,
        stdin: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> ValidationResult<AmpReport> {
        let program = self.runner.locate(&self.executable).ok_or_else(|| {
            ValidationError::ExecutableNotFound {
                program: self.executable.clone(),
            }
        })?;

        let output = self.runner.run(&program, &args, stdin, cancel).await?;
        let report = self.parser.parse_output(&output)?;

        info!(
            "AMP validation of {} document(s) found {} issue(s)",
            report.issues_by_path.len(),
            report.issues().count()
        );
        Ok(report)
    }
}
