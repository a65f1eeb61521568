//! Subprocess runner for locally installed validators
//!
//! Validators such as `amphtml-validator` exit nonzero just to say "found
//! errors", so a nonzero status is returned as data. Only a process that
//! can't be started or dies from a signal is an error.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::validation_error::{ValidationError, ValidationResult};

/// Captured result of a process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub exit_code: i32,
}

impl ProcessOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external programs
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Resolves `program` to an executable path, or `None` if it isn't installed
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Runs `program` with `args`, feeding `stdin` if given, and waits for it
    /// to exit or for `cancel` to fire.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> ValidationResult<ProcessOutput>;
}

/// `CommandRunner` backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        find_executable(program)
    }

    async fn run(
        &self,
        program: &Path,
        args: &[String],
        stdin: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> ValidationResult<ProcessOutput> {
        let name = program.display().to_string();
        if cancel.is_cancelled() {
            return Err(ValidationError::Cancelled);
        }

        info!("Running {} {}", name, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ValidationError::launch(&name, e))?;

        // Feed stdin from a separate task so a full stdout pipe can't deadlock us.
        let writer = match (child.stdin.take(), stdin) {
            (Some(mut pipe), Some(input)) => Some(tokio::spawn(async move {
                let result = pipe.write_all(&input).await;
                drop(pipe);
                result
            })),
            _ => None,
        };

        let output = tokio::select! {
            result = child.wait_with_output() => {
                result.map_err(|e| ValidationError::launch(&name, e))?
            },
            () = cancel.cancelled() => {
                warn!("🛑 {} cancelled; killing process", name);
                return Err(ValidationError::Cancelled);
            }
        };

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                // The tool may exit before reading all of its input.
                Ok(Err(e)) => debug!("Writing stdin to {} failed: {}", name, e),
                Err(e) => debug!("stdin writer for {} panicked: {}", name, e),
            }
        }

        let exit_code = output.status.code().ok_or_else(|| {
            ValidationError::launch(&name, format!("terminated abnormally ({})", output.status))
        })?;

        debug!(
            "{} exited with status {} ({} bytes of output)",
            name,
            exit_code,
            output.stdout.len()
        );
        Ok(ProcessOutput {
            stdout: output.stdout,
            exit_code,
        })
    }
}

/// Searches `PATH` for an executable called `program`.
///
/// A name containing a path separator is checked as given.
#[must_use]
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn executable_names(program: &str) -> impl Iterator<Item = String> + '_ {
    ["", ".exe", ".cmd", ".bat"]
        .into_iter()
        .map(move |ext| format!("{program}{ext}"))
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(program.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_not_found() {
        assert!(find_executable("page-validate-no-such-tool-3f9a").is_none());
    }

    #[test]
    fn exit_status_zero_is_success() {
        let output = ProcessOutput {
            stdout: Vec::new(),
            exit_code: 0,
        };
        assert!(output.success());
        assert!(
            !ProcessOutput {
                stdout: Vec::new(),
                exit_code: 1
            }
            .success()
        );
    }

    #[cfg(unix)]
    #[test]
    fn finds_shell_on_path() {
        let sh = find_executable("sh").expect("sh on PATH");
        assert!(sh.ends_with("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn explicit_path_is_checked_directly() {
        let dir = tempfile::tempdir().expect("temp dir");
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "not a program").expect("write file");
        assert!(find_executable(plain.to_str().expect("utf-8 path")).is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_returned_as_data() {
        let runner = SystemCommandRunner::new();
        let sh = runner.locate("sh").expect("sh on PATH");
        let args = vec!["-c".to_string(), "cat; exit 3".to_string()];

        let output = runner
            .run(&sh, &args, Some(b"hello".to_vec()), &CancellationToken::new())
            .await
            .expect("process ran");

        assert_eq!(output.stdout, b"hello");
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signal_termination_is_launch_failure() {
        let runner = SystemCommandRunner::new();
        let sh = runner.locate("sh").expect("sh on PATH");
        let args = vec!["-c".to_string(), "kill -9 $$".to_string()];

        let err = runner
            .run(&sh, &args, None, &CancellationToken::new())
            .await
            .expect_err("killed by signal");
        assert!(matches!(err, ValidationError::ProcessLaunchFailure { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancellation_aborts_wait() {
        let runner = SystemCommandRunner::new();
        let sh = runner.locate("sh").expect("sh on PATH");
        let args = vec!["-c".to_string(), "sleep 30".to_string()];
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = runner
            .run(&sh, &args, None, &cancel)
            .await
            .expect_err("cancelled");
        assert!(matches!(err, ValidationError::Cancelled));
    }
}
