use std::path::PathBuf;

/// Reasons to re-run the status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Initial update when the program starts
    Startup,
    /// A file under the workspace root changed
    FileChanged { path: PathBuf },
    /// A watched configuration file changed
    ConfigChanged { path: PathBuf },
    /// Requested by the user (stdin line or signal)
    Manual,
    /// Stop the run loop
    Shutdown,
}

impl Trigger {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Trigger::Shutdown)
    }

    pub fn is_config_change(&self) -> bool {
        matches!(self, Trigger::ConfigChanged { .. })
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Startup => write!(f, "startup"),
            Trigger::FileChanged { path } => write!(f, "file changed: {}", path.display()),
            Trigger::ConfigChanged { path } => write!(f, "config changed: {}", path.display()),
            Trigger::Manual => write!(f, "manual"),
            Trigger::Shutdown => write!(f, "shutdown"),
        }
    }
}
