//! validate-page binary entry point.
//! Validates one document and prints its issues, one per line.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::{Cli, FileType};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use page_validate::application::{
    AmpValidator, CssValidator, HtmlValidator, render_amp_results_page,
};
use page_validate::domain::{DocumentKind, Issue};
use page_validate::infrastructure::{
    HttpClient, InconsistencyError, SystemCommandRunner, ValidatorConfig, init_logging,
};

/// What a validator run produced, whichever authority it used
struct Outcome {
    issues: Vec<Issue>,
    results_page: Vec<u8>,
    inconsistency: Option<InconsistencyError>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(file_type) = cli
        .file_type
        .or_else(|| cli.file.as_deref().and_then(FileType::infer))
    else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "can't infer the document type; pass --type",
            )
            .exit();
    };

    match run(&cli, file_type).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Validation failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, file_type: FileType) -> Result<ExitCode> {
    let mut config =
        ValidatorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    init_logging(&config.logging)?;

    let document = read_document(cli.file.as_deref()).await?;
    debug!("Read {} bytes; validating as {:?}", document.len(), file_type);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Interrupted; cancelling validation");
            trigger.cancel();
        }
    });

    let outcome = validate(&config, file_type, &document, &cancel).await?;

    for issue in &outcome.issues {
        println!("{issue}");
    }

    if let Some(path) = &cli.output {
        tokio::fs::write(path, &outcome.results_page)
            .await
            .with_context(|| format!("Failed to write results page to {}", path.display()))?;
    }

    if let Some(inconsistency) = outcome.inconsistency {
        eprintln!("Warning: inconsistent validation result: {inconsistency}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn read_document(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to open input file {}", path.display())),
        None => {
            let mut document = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut document)
                .await
                .context("Failed to read stdin")?;
            Ok(document)
        }
    }
}

async fn validate(
    config: &ValidatorConfig,
    file_type: FileType,
    document: &[u8],
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let outcome = match file_type {
        FileType::Amp => {
            let validator =
                AmpValidator::from_config(Arc::new(SystemCommandRunner::new()), &config.amp);
            let report = validator.validate(document, cancel).await?;
            let issues = report.stdin_issues().to_vec();
            Outcome {
                results_page: render_amp_results_page(&issues),
                issues,
                inconsistency: report.inconsistency,
            }
        }
        FileType::Css | FileType::Htmlcss => {
            let kind = if file_type == FileType::Css {
                DocumentKind::Stylesheet
            } else {
                DocumentKind::HtmlDocument
            };
            let transport = Arc::new(HttpClient::new(config.http.clone())?);
            let validator =
                CssValidator::from_config(transport, &config.endpoints, config.css.clone());
            let report = validator.validate(document, kind, cancel).await?;
            Outcome {
                issues: report.issues,
                results_page: report.raw_response,
                inconsistency: report.inconsistency,
            }
        }
        FileType::Html => {
            let transport = Arc::new(HttpClient::new(config.http.clone())?);
            let validator = HtmlValidator::from_config(transport, &config.endpoints);
            let report = validator.validate(document, cancel).await?;
            Outcome {
                issues: report.issues,
                results_page: report.raw_response,
                inconsistency: report.inconsistency,
            }
        }
    };
    Ok(outcome)
}
