use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace};

use crate::{EventFilter, Trigger, WatchError};

/// Options for [`WorkspaceWatcher::start`]
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Skip paths matched by the root `.gitignore`
    pub respect_gitignore: bool,
    /// Configuration files whose changes emit [`Trigger::ConfigChanged`]
    pub config_paths: Vec<PathBuf>,
}

/// Watches the workspace root (recursively) and config files, sending triggers.
pub struct WorkspaceWatcher {
    root: PathBuf,
    _watcher: RecommendedWatcher,
}

impl WorkspaceWatcher {
    pub fn start(
        root: &Path,
        options: WatchOptions,
        tx: UnboundedSender<Trigger>,
    ) -> Result<Self, WatchError> {
        if !root.is_dir() {
            return Err(WatchError::MissingRoot(root.to_path_buf()));
        }
        let root = root.canonicalize()?;

        // Backends report canonical paths on some platforms, so compare canonical forms
        let config_paths: Vec<PathBuf> = options
            .config_paths
            .iter()
            .map(|p| canonical_or_joined(p))
            .collect();

        let mut filter = EventFilter::new(&root).with_config_paths(config_paths.clone());
        if options.respect_gitignore {
            filter = filter.with_gitignore(&root);
        }

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                Self::handle_event(&filter, &tx, &event);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        // Editors often replace files on save, so watch the parent directory
        for config in &config_paths {
            if config.starts_with(&root) {
                continue;
            }
            if let Some(parent) = config.parent().filter(|p| p.is_dir()) {
                watcher.watch(parent, RecursiveMode::NonRecursive)?;
                debug!(path = %config.display(), "Watching config file");
            }
        }

        info!(root = %root.display(), "Watching workspace");

        Ok(Self {
            root,
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn handle_event(filter: &EventFilter, tx: &UnboundedSender<Trigger>, event: &Event) {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
            _ => return,
        }

        for path in &event.paths {
            match filter.classify(path) {
                Some(trigger) => {
                    trace!(%trigger, "Filesystem event");
                    let _ = tx.send(trigger);
                }
                None => trace!(path = %path.display(), "Ignored filesystem event"),
            }
        }
    }
}

/// Canonicalize a path that may not exist yet by canonicalizing its parent
fn canonical_or_joined(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    #[test]
    fn test_missing_root_is_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = WorkspaceWatcher::start(&missing, WatchOptions::default(), tx);
        assert!(matches!(result, Err(WatchError::MissingRoot(_))));
    }

    #[test]
    fn test_canonical_or_joined_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("diffline.toml");
        let resolved = canonical_or_joined(&missing);
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("diffline.toml"));
    }

    #[tokio::test]
    async fn test_file_write_sends_trigger() {
        let dir = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let watcher = WorkspaceWatcher::start(dir.path(), WatchOptions::default(), tx).unwrap();

        std::fs::write(watcher.root().join("hello.txt"), "hi").unwrap();

        let trigger = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no filesystem event within timeout")
            .unwrap();
        assert!(matches!(trigger, Trigger::FileChanged { .. }));
    }
}
