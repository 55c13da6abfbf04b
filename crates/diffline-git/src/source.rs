use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::{CommandSource, GitError, LibGit2Source};

/// Anything that can produce `git diff --shortstat` text for a directory
#[async_trait]
pub trait DiffSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Return the diff summary text for `dir`. An empty string means no changes.
    async fn shortstat(&self, dir: &Path) -> Result<String, GitError>;
}

/// Supported diff source backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Spawn the git binary
    #[default]
    Command,
    /// Use libgit2, no git binary required
    LibGit2,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Command => write!(f, "command"),
            Backend::LibGit2 => write!(f, "libgit2"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" | "cli" | "git" => Ok(Backend::Command),
            "libgit2" | "git2" => Ok(Backend::LibGit2),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

/// Everything needed to build a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub backend: Backend,
    /// Git executable, only used by the command backend
    pub git_binary: PathBuf,
    /// Extra arguments appended after `diff --shortstat`
    pub extra_args: Vec<String>,
    /// Summarize staged changes instead of unstaged ones
    pub staged: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            git_binary: PathBuf::from("git"),
            extra_args: Vec::new(),
            staged: false,
        }
    }
}

impl SourceConfig {
    /// Keys that are set but have no effect on the selected backend
    pub fn ignored_keys(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        if self.backend == Backend::LibGit2 {
            if self.git_binary != Path::new("git") {
                ignored.push("git_binary");
            }
            if !self.extra_args.is_empty() {
                ignored.push("extra_args");
            }
        }
        ignored
    }
}

/// Create a source for the configured backend
pub fn build_source(config: &SourceConfig) -> Box<dyn DiffSource> {
    for key in config.ignored_keys() {
        warn!(key, backend = %config.backend, "Setting is ignored by this backend");
    }

    match config.backend {
        Backend::Command => Box::new(
            CommandSource::new()
                .with_binary(config.git_binary.clone())
                .with_args(config.extra_args.clone())
                .with_staged(config.staged),
        ),
        Backend::LibGit2 => Box::new(LibGit2Source::new().with_staged(config.staged)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("command".parse::<Backend>().unwrap(), Backend::Command);
        assert_eq!("LibGit2".parse::<Backend>().unwrap(), Backend::LibGit2);
        assert_eq!("git2".parse::<Backend>().unwrap(), Backend::LibGit2);
        assert!("svn".parse::<Backend>().is_err());
    }

    #[test]
    fn test_backend_display_matches_serde_name() {
        assert_eq!(Backend::LibGit2.to_string(), "libgit2");
        assert_eq!(Backend::Command.to_string(), "command");
    }

    #[test]
    fn test_ignored_keys_for_libgit2() {
        let config = SourceConfig {
            backend: Backend::LibGit2,
            git_binary: PathBuf::from("/opt/git/bin/git"),
            extra_args: vec!["HEAD".to_string()],
            staged: false,
        };
        assert_eq!(config.ignored_keys(), vec!["git_binary", "extra_args"]);
    }

    #[test]
    fn test_no_ignored_keys_for_command_backend() {
        let config = SourceConfig {
            extra_args: vec!["HEAD".to_string()],
            git_binary: PathBuf::from("/opt/git/bin/git"),
            ..Default::default()
        };
        assert!(config.ignored_keys().is_empty());

        let defaults = SourceConfig {
            backend: Backend::LibGit2,
            ..Default::default()
        };
        assert!(defaults.ignored_keys().is_empty());
    }

    #[test]
    fn test_build_source_picks_backend() {
        let command = build_source(&SourceConfig::default());
        assert_eq!(command.name(), "command");

        let native = build_source(&SourceConfig {
            backend: Backend::LibGit2,
            ..Default::default()
        });
        assert_eq!(native.name(), "libgit2");
    }
}
