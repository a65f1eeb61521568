//! Logging system configuration and initialization
//!
//! Console output goes to stderr so it never mixes with the issue list on
//! stdout. File output is optional and written by a non-blocking appender.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use once_cell::sync::Lazy;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;
use crate::infrastructure::config::defaults;

type FilteredRegistry = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

// Keeps the file writer alive for the life of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Millisecond UTC timestamps
struct UtcTimeFormatter;

impl FormatTime for UtcTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"))
    }
}

/// `<local data dir>/page-validate/logs`, or `./logs` without one
#[must_use]
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(defaults::APP_DIR_NAME))
        .unwrap_or_default()
        .join("logs")
}

/// Builds the filter used when `RUST_LOG` is unset.
///
/// HTTP internals stay at `warn` unless `trace` was asked for.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    let mut filter =
        EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {level}"))?;

    if !level.to_lowercase().contains("trace") {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn", "h2=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }
    Ok(filter)
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_timer(UtcTimeFormatter)
        .with_target(false);
    if config.json_format {
        layers.push(console_layer.json().boxed());
    } else {
        layers.push(console_layer.boxed());
    }

    if config.file_output {
        let log_dir = config
            .log_dir
            .clone()
            .unwrap_or_else(default_log_directory);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let (file_writer, file_guard) =
            non_blocking(rolling::never(&log_dir, defaults::LOG_FILE_NAME));
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("log guard registry poisoned"))?
            .push(file_guard);

        let file_layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(UtcTimeFormatter)
            .with_ansi(false);
        if config.json_format {
            layers.push(
                file_layer
                    .json()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .boxed(),
            );
        } else {
            layers.push(file_layer.with_target(false).boxed());
        }
    }

    Registry::default()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized at {}", config.level);
    Ok(())
}
