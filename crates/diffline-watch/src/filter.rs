use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::Trigger;

/// Decides which filesystem paths should trigger an update
pub struct EventFilter {
    git_dir: PathBuf,
    gitignore: Option<Gitignore>,
    config_paths: Vec<PathBuf>,
}

impl EventFilter {
    pub fn new(root: &Path) -> Self {
        Self {
            git_dir: root.join(".git"),
            gitignore: None,
            config_paths: Vec::new(),
        }
    }

    /// Load the root `.gitignore` so ignored paths (build output, caches) stay quiet
    pub fn with_gitignore(mut self, root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        let ignore_file = root.join(".gitignore");
        if ignore_file.exists() {
            if let Some(e) = builder.add(&ignore_file) {
                warn!(error = %e, path = %ignore_file.display(), "Partially invalid .gitignore");
            }
        }
        match builder.build() {
            Ok(gitignore) => self.gitignore = Some(gitignore),
            Err(e) => warn!(error = %e, "Failed to build gitignore matcher"),
        }
        self
    }

    pub fn with_config_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    /// Map a changed path to a trigger, or `None` to drop it
    pub fn classify(&self, path: &Path) -> Option<Trigger> {
        if self.config_paths.iter().any(|p| p == path) {
            return Some(Trigger::ConfigChanged {
                path: path.to_path_buf(),
            });
        }

        // git diff refreshes .git/index; reacting to it would loop forever
        if path.starts_with(&self.git_dir) {
            return None;
        }

        if let Some(ref gitignore) = self.gitignore {
            if path.starts_with(gitignore.path())
                && gitignore
                    .matched_path_or_any_parents(path, path.is_dir())
                    .is_ignore()
            {
                return None;
            }
        }

        Some(Trigger::FileChanged {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_git_dir_is_dropped() {
        let dir = TempDir::new().unwrap();
        let filter = EventFilter::new(dir.path());
        assert_eq!(filter.classify(&dir.path().join(".git").join("index")), None);
        assert_eq!(filter.classify(&dir.path().join(".git")), None);
    }

    #[test]
    fn test_regular_file_triggers() {
        let dir = TempDir::new().unwrap();
        let filter = EventFilter::new(dir.path());
        let path = dir.path().join("src").join("main.rs");
        assert_eq!(
            filter.classify(&path),
            Some(Trigger::FileChanged { path: path.clone() })
        );
    }

    #[test]
    fn test_gitignored_paths_are_dropped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n*.log\n").unwrap();
        fs::create_dir_all(dir.path().join("target").join("debug")).unwrap();

        let filter = EventFilter::new(dir.path()).with_gitignore(dir.path());

        assert_eq!(
            filter.classify(&dir.path().join("target").join("debug").join("app")),
            None
        );
        assert_eq!(filter.classify(&dir.path().join("build.log")), None);
        assert!(filter.classify(&dir.path().join("src").join("lib.rs")).is_some());
    }

    #[test]
    fn test_gitignore_ignored_when_disabled() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();

        let filter = EventFilter::new(dir.path());
        assert!(filter.classify(&dir.path().join("build.log")).is_some());
    }

    #[test]
    fn test_config_paths_classified() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("diffline.toml");
        let filter = EventFilter::new(dir.path()).with_config_paths(vec![config.clone()]);

        assert_eq!(
            filter.classify(&config),
            Some(Trigger::ConfigChanged { path: config.clone() })
        );
    }

    #[test]
    fn test_paths_outside_root_are_not_matched_against_gitignore() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*\n").unwrap();
        let other = TempDir::new().unwrap();

        let filter = EventFilter::new(dir.path()).with_gitignore(dir.path());
        assert!(filter.classify(&other.path().join("x.txt")).is_some());
    }
}
