//! Running git as a subprocess.
//!
//! Everything above this module talks to git through [`GitExec`], so the
//! resolution pipeline can be driven by scripted output in tests.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, warn};

/// Failure of a single git invocation.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The git binary could not be started.
    #[error("Failed to run `git {command}`: {source}")]
    Spawn {
        /// The git arguments, space separated.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// git exited with a non-zero status.
    #[error("`git {command}` failed ({status}): {stderr}")]
    Failed {
        /// The git arguments, space separated.
        command: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Trimmed standard error.
        stderr: String,
    },

    /// git exited successfully but wrote to standard error.
    #[error("`git {command}` reported: {stderr}")]
    Stderr {
        /// The git arguments, space separated.
        command: String,
        /// Trimmed standard error.
        stderr: String,
    },

    /// Standard output was larger than the configured limit.
    #[error("`git {command}` produced more than {limit} bytes of output")]
    OutputLimit {
        /// The git arguments, space separated.
        command: String,
        /// The configured limit in bytes.
        limit: usize,
    },

    /// Standard output was not UTF-8.
    #[error("`git {command}` produced output that is not valid UTF-8")]
    InvalidUtf8 {
        /// The git arguments, space separated.
        command: String,
    },
}

/// Something that can run a git command and hand back its standard output.
pub trait GitExec {
    /// Run `git <args>` in `cwd`.
    ///
    /// `max_output` caps the size of standard output in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be started, exits non-zero, writes to
    /// standard error, or exceeds `max_output`.
    fn exec(&self, args: &[&str], cwd: &Path, max_output: Option<usize>)
    -> Result<String, ExecError>;
}

impl<T: GitExec + ?Sized> GitExec for &T {
    fn exec(
        &self,
        args: &[&str],
        cwd: &Path,
        max_output: Option<usize>,
    ) -> Result<String, ExecError> {
        (**self).exec(args, cwd, max_output)
    }
}

/// [`GitExec`] backed by the `git` binary on `PATH`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliGit {
    /// Clear `GIT_DIR` and `GIT_WORK_TREE` before running commands.
    pub unset_git_dir: bool,
}

impl CliGit {
    /// Create a runner.
    #[must_use]
    pub const fn new(unset_git_dir: bool) -> Self {
        Self { unset_git_dir }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if self.unset_git_dir {
            cmd.env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");
        }
        cmd
    }
}

impl GitExec for CliGit {
    fn exec(
        &self,
        args: &[&str],
        cwd: &Path,
        max_output: Option<usize>,
    ) -> Result<String, ExecError> {
        let command = args.join(" ");
        debug!(command = %command, cwd = %cwd.display(), "Running git");

        let output = self
            .command()
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            warn!(command = %command, stderr = %stderr, "git failed");
            return Err(ExecError::Failed {
                command,
                status: output.status.to_string(),
                stderr,
            });
        }
        if !stderr.is_empty() {
            warn!(command = %command, stderr = %stderr, "git wrote to stderr");
            return Err(ExecError::Stderr { command, stderr });
        }

        check_output_limit(&command, output.stdout.len(), max_output)?;
        String::from_utf8(output.stdout).map_err(|_| ExecError::InvalidUtf8 { command })
    }
}

fn check_output_limit(command: &str, len: usize, limit: Option<usize>) -> Result<(), ExecError> {
    match limit {
        Some(limit) if len > limit => Err(ExecError::OutputLimit {
            command: command.to_string(),
            limit,
        }),
        _ => Ok(()),
    }
}
