use thiserror::Error;

/// Errors raised while obtaining a diff summary
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git diff exited with code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    #[error("Not a git repository: {0}")]
    NotARepo(String),

    #[error("Git operation failed: {0}")]
    Git2(#[from] git2::Error),

    #[error("Diff task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
