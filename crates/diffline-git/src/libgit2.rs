use async_trait::async_trait;
use git2::{DiffOptions, DiffStatsFormat, ErrorCode, Repository};
use std::path::Path;
use tracing::debug;

use crate::{DiffSource, GitError};

/// Width hint for libgit2's stat renderer; the short format ignores it.
const STATS_WIDTH: usize = 80;

/// Computes the shortstat summary in-process with libgit2
#[derive(Debug, Clone, Default)]
pub struct LibGit2Source {
    staged: bool,
}

impl LibGit2Source {
    pub fn new() -> Self {
        Self { staged: false }
    }

    pub fn with_staged(mut self, staged: bool) -> Self {
        self.staged = staged;
        self
    }

    /// Blocking implementation shared by the async entry point
    pub fn shortstat_blocking(&self, dir: &Path) -> Result<String, GitError> {
        let repo = Repository::discover(dir).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitError::NotARepo(dir.display().to_string())
            } else {
                GitError::Git2(e)
            }
        })?;

        let mut opts = DiffOptions::new();

        let diff = if self.staged {
            // Try to get HEAD tree, handle empty repo case
            let head_tree = match repo.head() {
                Ok(head) => Some(head.peel_to_tree()?),
                Err(e) if e.code() == ErrorCode::UnbornBranch => None,
                Err(e) => return Err(GitError::Git2(e)),
            };
            repo.diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))?
        } else {
            repo.diff_index_to_workdir(None, Some(&mut opts))?
        };

        let stats = diff.stats()?;

        debug!(
            files_changed = stats.files_changed(),
            insertions = stats.insertions(),
            deletions = stats.deletions(),
            staged = self.staged,
            "Computed libgit2 diff stats"
        );

        // git prints nothing for a clean tree; libgit2 would print zeros
        if stats.files_changed() == 0 {
            return Ok(String::new());
        }

        let buf = stats.to_buf(DiffStatsFormat::SHORT, STATS_WIDTH)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl DiffSource for LibGit2Source {
    fn name(&self) -> &str {
        "libgit2"
    }

    async fn shortstat(&self, dir: &Path) -> Result<String, GitError> {
        let source = self.clone();
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || source.shortstat_blocking(&dir)).await?
    }
}
