//! # diffline-git
//!
//! Sources of git diff summaries for diffline.
//!
//! A source produces the text `git diff --shortstat` would print for a
//! directory. The text is handed to the change parser unchanged.
//!
//! ## Key Types
//!
//! - [`DiffSource`] - The seam every source implements
//! - [`CommandSource`] - Spawns the git binary
//! - [`LibGit2Source`] - Computes the same summary in-process via libgit2
//! - [`Backend`] / [`SourceConfig`] - Selects and configures a source
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diffline_git::{build_source, SourceConfig};
//!
//! let source = build_source(&SourceConfig::default());
//! let text = source.shortstat(std::path::Path::new(".")).await?;
//! println!("{}", text);
//! ```

mod command;
mod error;
mod libgit2;
mod source;

pub use command::CommandSource;
pub use error::GitError;
pub use libgit2::LibGit2Source;
pub use source::{build_source, Backend, DiffSource, SourceConfig};
