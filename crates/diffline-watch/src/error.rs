use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Workspace root does not exist: {0}")]
    MissingRoot(PathBuf),

    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
