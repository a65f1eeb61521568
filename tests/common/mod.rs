//! Fakes and fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use page_validate::infrastructure::{
    CommandRunner, FilePart, FormTransport, ProcessOutput, ValidationError, ValidationResult,
};
use tokio_util::sync::CancellationToken;

pub const NU_INVALID: &str = include_str!("../fixtures/nu_invalid.html");
pub const NU_VALID: &str = include_str!("../fixtures/nu_valid.html");
pub const CSS_INVALID: &str = include_str!("../fixtures/css_invalid.html");
pub const CSS_VALID: &str = include_str!("../fixtures/css_valid.html");
pub const AMP_INVALID: &str = include_str!("../fixtures/amp_invalid.json");
pub const AMP_VALID: &str = include_str!("../fixtures/amp_valid.json");

/// Answers every post with the same page and remembers what was sent
pub struct CannedTransport {
    body: String,
    posts: Mutex<Vec<(String, Vec<(String, String)>, Vec<FilePart>)>>,
}

impl CannedTransport {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn posts(&self) -> Vec<(String, Vec<(String, String)>, Vec<FilePart>)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormTransport for CannedTransport {
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
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), fields.to_vec(), files));
        Ok(self.body.clone().into_bytes())
    }
}

/// Pretends to be an installed tool that prints `stdout` and exits with `exit_code`
pub struct CannedRunner {
    stdout: String,
    exit_code: i32,
    args: Mutex<Vec<Vec<String>>>,
}

impl CannedRunner {
    pub fn new(stdout: &str, exit_code: i32) -> Self {
        Self {
            stdout: stdout.to_string(),
            exit_code,
            args: Mutex::new(Vec::new()),
        }
    }

    pub fn args(&self) -> Vec<Vec<String>> {
        self.args.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for CannedRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        Some(Path::new("/opt/bin").join(program))
    }

    async fn run(
        &self,
        _program: &Path,
        args: &[String],
        _stdin: Option<Vec<u8>>,
        _cancel: &CancellationToken,
    ) -> ValidationResult<ProcessOutput> {
        self.args.lock().unwrap().push(args.to_vec());
        Ok(ProcessOutput {
            stdout: self.stdout.clone().into_bytes(),
            exit_code: self.exit_code,
        })
    }
}
