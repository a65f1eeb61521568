//! Configuration for validator endpoints, tool paths, HTTP and logging
//!
//! Values come from built-in defaults, then an optional config file, then
//! `PAGE_VALIDATE__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use super::http_client::HttpClientConfig;

/// Default values and fixed names
pub mod defaults {
    /// Nu Html Checker endpoint
    pub const NU_CHECKER_URL: &str = "https://validator.w3.org/nu/";

    /// W3C CSS Validation Service endpoint
    pub const CSS_VALIDATOR_URL: &str = "https://jigsaw.w3.org/css-validator/validator";

    pub const CSS_PROFILE: &str = "css3svg";
    pub const CSS_USERMEDIUM: &str = "all";
    /// `1` reports normal warnings; `0`/`2` are fewer/more
    pub const CSS_WARNING: &str = "1";
    /// Empty means vendor extensions are reported as warnings
    pub const CSS_VEXTWARNING: &str = "";
    pub const CSS_LANG: &str = "en";

    pub const AMP_EXECUTABLE: &str = "amphtml-validator";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_FILE_NAME: &str = "page-validate.log";

    pub const ENV_PREFIX: &str = "PAGE_VALIDATE";
    pub const ENV_SEPARATOR: &str = "__";

    pub const APP_DIR_NAME: &str = "page-validate";
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub nu_checker_url: String,
    pub css_validator_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            nu_checker_url: defaults::NU_CHECKER_URL.to_string(),
            css_validator_url: defaults::CSS_VALIDATOR_URL.to_string(),
        }
    }
}

/// Form parameters sent to the CSS Validation Service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssParameters {
    pub profile: String,
    pub usermedium: String,
    pub warning: String,
    pub vextwarning: String,
    pub lang: String,
}

impl Default for CssParameters {
    fn default() -> Self {
        Self {
            profile: defaults::CSS_PROFILE.to_string(),
            usermedium: defaults::CSS_USERMEDIUM.to_string(),
            warning: defaults::CSS_WARNING.to_string(),
            vextwarning: defaults::CSS_VEXTWARNING.to_string(),
            lang: defaults::CSS_LANG.to_string(),
        }
    }
}

impl CssParameters {
    /// Form fields in the order the service's own form sends them
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        [
            ("profile", &self.profile),
            ("usermedium", &self.usermedium),
            ("warning", &self.warning),
            ("vextwarning", &self.vextwarning),
            ("lang", &self.lang),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmpConfig {
    /// Name looked up on `PATH`, or a path to the executable
    pub executable: String,
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            executable: defaults::AMP_EXECUTABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    pub level: String,
    pub json_format: bool,
    pub file_output: bool,
    /// Defaults to the platform's local data directory
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            file_output: false,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub endpoints: EndpointConfig,
    pub css: CssParameters,
    pub amp: AmpConfig,
    pub http: HttpClientConfig,
    pub logging: LoggingConfig,
}

impl ValidatorConfig {
    /// Loads configuration from `path` (or the default config file, if it
    /// exists) and the environment, then validates it.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let environment = config::Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator(defaults::ENV_SEPARATOR)
            .separator(defaults::ENV_SEPARATOR)
            .try_parsing(true);
        Self::load_from(path, environment)
    }

    fn load_from(path: Option<&Path>, environment: config::Environment) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    debug!("Looking for optional config at {}", default_path.display());
                    builder = builder.add_source(config::File::from(default_path).required(false));
                }
            }
        }

        let settings = builder.add_source(environment).build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_service_url("endpoints.nu_checker_url", &self.endpoints.nu_checker_url)?;
        check_service_url("endpoints.css_validator_url", &self.endpoints.css_validator_url)?;

        if self.amp.executable.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "amp.executable must not be empty".to_string(),
            });
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "http.timeout_seconds must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

fn check_service_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::Validation {
        message: format!("{name} is not a valid URL ({value:?}): {e}"),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::Validation {
            message: format!("{name} must use http or https, not {scheme}"),
        }),
    }
}

/// `<config dir>/page-validate/config.toml`, if the platform has a config dir
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| {
        dir.join(defaults::APP_DIR_NAME)
            .join(defaults::CONFIG_FILE_NAME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        config::Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator(defaults::ENV_SEPARATOR)
            .separator(defaults::ENV_SEPARATOR)
            .try_parsing(true)
            .source(Some(source))
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        std::fs::write(file.path(), contents).expect("write config");
        file
    }

    #[test]
    fn defaults_match_service_contracts() {
        let config = ValidatorConfig::default();
        assert_eq!(config.endpoints.nu_checker_url, "https://validator.w3.org/nu/");
        assert_eq!(
            config.endpoints.css_validator_url,
            "https://jigsaw.w3.org/css-validator/validator"
        );
        assert_eq!(config.amp.executable, "amphtml-validator");
        assert_eq!(config.http.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn css_form_fields_are_ordered() {
        let fields = CssParameters::default().form_fields();
        let expected = [
            ("profile", "css3svg"),
            ("usermedium", "all"),
            ("warning", "1"),
            ("vextwarning", ""),
            ("lang", "en"),
        ];
        assert_eq!(fields.len(), expected.len());
        for ((name, value), (want_name, want_value)) in fields.iter().zip(expected) {
            assert_eq!(name, want_name);
            assert_eq!(value, want_value);
        }
    }

    #[test]
    fn empty_sources_give_defaults() {
        let file = write_config("");
        let config = ValidatorConfig::load_from(Some(file.path()), env(&[])).expect("load");
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_config(
            r#"
[endpoints]
nu_checker_url = "http://localhost:8888/"

[amp]
executable = "/opt/amp/bin/amphtml-validator"

[logging]
level = "debug"
"#,
        );
        let config = ValidatorConfig::load_from(Some(file.path()), env(&[])).expect("load");
        assert_eq!(config.endpoints.nu_checker_url, "http://localhost:8888/");
        assert_eq!(config.endpoints.css_validator_url, defaults::CSS_VALIDATOR_URL);
        assert_eq!(config.amp.executable, "/opt/amp/bin/amphtml-validator");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[http]\ntimeout_seconds = 10\n");
        let config = ValidatorConfig::load_from(
            Some(file.path()),
            env(&[
                ("PAGE_VALIDATE__HTTP__TIMEOUT_SECONDS", "60"),
                ("PAGE_VALIDATE__CSS__PROFILE", "css21"),
            ]),
        )
        .expect("load");
        assert_eq!(config.http.timeout_seconds, 60);
        assert_eq!(config.css.profile, "css21");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        let err = ValidatorConfig::load_from(Some(&missing), env(&[])).expect_err("missing file");
        assert!(matches!(err, ConfigError::Load { .. }));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut config = ValidatorConfig::default();
        config.endpoints.css_validator_url = "ftp://jigsaw.w3.org/".to_string();
        let err = config.validate().expect_err("ftp endpoint");
        assert!(err.to_string().contains("css_validator_url"));
    }

    #[test]
    fn rejects_relative_endpoint() {
        let mut config = ValidatorConfig::default();
        config.endpoints.nu_checker_url = "/nu/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_executable_and_zero_timeout() {
        let mut config = ValidatorConfig::default();
        config.amp.executable = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ValidatorConfig::default();
        config.http.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_config_path_is_app_scoped() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("page-validate/config.toml"));
        }
    }
}
