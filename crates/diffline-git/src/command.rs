use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use crate::{DiffSource, GitError};

/// Runs `git diff --shortstat` as a child process
pub struct CommandSource {
    binary: PathBuf,
    extra_args: Vec<String>,
    staged: bool,
}

impl Default for CommandSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSource {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("git"),
            extra_args: Vec::new(),
            staged: false,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_staged(mut self, staged: bool) -> Self {
        self.staged = staged;
        self
    }

    /// Arguments passed to the git binary
    pub fn args(&self) -> Vec<&str> {
        let mut args = vec!["diff", "--shortstat"];
        if self.staged {
            args.push("--cached");
        }
        args.extend(self.extra_args.iter().map(String::as_str));
        args
    }
}

#[async_trait]
impl DiffSource for CommandSource {
    fn name(&self) -> &str {
        "command"
    }

    async fn shortstat(&self, dir: &Path) -> Result<String, GitError> {
        let start = Instant::now();
        let args = self.args();

        debug!(
            binary = %self.binary.display(),
            args = ?args,
            working_dir = %dir.display(),
            "Spawning git diff"
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .await?;

        let code = output.status.code().unwrap_or(-1);
        debug!(
            exit_code = code,
            duration_ms = start.elapsed().as_millis(),
            stdout_bytes = output.stdout.len(),
            "git diff completed"
        );

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                code,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
