//! # diffline-watch
//!
//! Everything that tells diffline to re-run its update.
//!
//! ## Key Types
//!
//! - [`Trigger`] - Why an update was requested
//! - [`WorkspaceWatcher`] - Filesystem watcher over the workspace root and config files
//! - [`EventFilter`] - Drops `.git/` internals and gitignored paths, spots config files
//!
//! Manual triggers come from [`spawn_stdin_trigger`] and, on Unix,
//! [`spawn_signal_trigger`]. All sources send into one channel so updates
//! are processed one at a time.

mod error;
mod filter;
mod manual;
mod trigger;
mod watcher;

pub use error::WatchError;
pub use filter::EventFilter;
#[cfg(unix)]
pub use manual::spawn_signal_trigger;
pub use manual::spawn_stdin_trigger;
pub use trigger::Trigger;
pub use watcher::{WatchOptions, WorkspaceWatcher};
