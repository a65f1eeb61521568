//! Test utilities for page-validate
//!
//! Fakes for the transport and subprocess seams, plus captured result pages
//! from the real services.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::http_client::{FilePart, FormTransport};
use crate::infrastructure::process_runner::{CommandRunner, ProcessOutput};
use crate::infrastructure::validation_error::{ValidationError, ValidationResult};

/// Result pages and tool output captured from the real validators
pub mod fixtures {
    pub const NU_INVALID: &str = include_str!("../tests/fixtures/nu_invalid.html");
    pub const NU_VALID: &str = include_str!("../tests/fixtures/nu_valid.html");
    pub const CSS_INVALID: &str = include_str!("../tests/fixtures/css_invalid.html");
    pub const CSS_VALID: &str = include_str!("../tests/fixtures/css_valid.html");
    pub const AMP_INVALID: &str = include_str!("../tests/fixtures/amp_invalid.json");
    pub const AMP_VALID: &str = include_str!("../tests/fixtures/amp_valid.json");
}

/// A request seen by [`FakeTransport`]
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl RecordedPost {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Transport that returns a canned body, or fails with a transport error
pub struct FakeTransport {
    response: Result<Vec<u8>, String>,
    requests: Mutex<Vec<RecordedPost>>,
}

impl FakeTransport {
    pub fn responding(body: &str) -> Self {
        Self {
            response: Ok(body.as_bytes().to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedPost> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormTransport for FakeTransport {
    async fn post(
        &self,
        url: &str,
        fields: &[(String, String)],
        files: Vec<FilePart>,
        cancel: &CancellationToken,
    ) -> ValidationResult<Vec<u8>> {
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }
        self.requests.lock().unwrap().push(RecordedPost {
            url: url.to_string(),
            fields: fields.to_vec(),
            files,
        });
        self.response
            .clone()
            .map_err(|message| ValidationError::transport(url, message))
    }
}

/// A run seen by [`FakeRunner`]
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

/// Command runner with a canned result
pub struct FakeRunner {
    installed: bool,
    output: Result<ProcessOutput, String>,
    runs: Mutex<Vec<RecordedRun>>,
}

impl FakeRunner {
    pub fn with_output(stdout: &str, exit_code: i32) -> Self {
        Self {
            installed: true,
            output: Ok(ProcessOutput {
                stdout: stdout.as_bytes().to_vec(),
                exit_code,
            }),
            runs: Mutex::new(Vec::new()),
        }
    }

    /// `locate` finds nothing
    pub fn not_installed() -> Self {
        Self {
            installed: false,
            ..Self::with_output("", 0)
        }
    }

    /// Installed, but fails to launch
    pub fn broken(message: &str) -> Self {
        Self {
            installed: true,
            output: Err(message.to_string()),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.installed
            .then(|| Path::new("/usr/local/bin").join(program))
    }

    async fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> ValidationResult<ProcessOutput> {
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }
        self.runs.lock().unwrap().push(RecordedRun {
            program: program.to_path_buf(),
            args: args.to_vec(),
            stdin,
        });
        self.output
            .clone()
            .map_err(|message| ValidationError::launch(&program.display().to_string(), message))
    }
}
