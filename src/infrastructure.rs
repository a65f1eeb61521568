//! Infrastructure layer: transport, subprocess, parsing, config and logging
//!
//! Everything that talks to the outside world or decodes what it sends back
//! lives here. The validators in `application` only see the traits.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod process_runner;
pub mod validation_error;

pub use config::{ConfigError, LoggingConfig, ValidatorConfig};
pub use http_client::{FilePart, FormTransport, HttpClient, HttpClientConfig};
pub use logging::init_logging;
pub use parsing::{AmpReportParser, CssReportParser, HtmlReportParser, ResultPageParser};
pub use process_runner::{CommandRunner, ProcessOutput, SystemCommandRunner, find_executable};
pub use validation_error::{InconsistencyError, ValidationError, ValidationResult};
