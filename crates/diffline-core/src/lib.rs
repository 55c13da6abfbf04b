//! # diffline-core
//!
//! Turns `git diff --shortstat` output into a one-line change indicator.
//!
//! ## Overview
//!
//! Every update runs the same short pipeline:
//! - A [`DiffSource`](diffline_git::DiffSource) produces the summary text
//! - [`ChangeSummary::parse`] extracts insertions, deletions and files
//! - [`format_changes`] renders three glyph-prefixed counts
//! - A [`StatusDisplay`] shows the label, or hides when there is nothing to show
//!
//! ## Key Types
//!
//! - [`ChangeSummary`] - Parsed counts plus the raw text
//! - [`GlyphSet`] - Icon tokens prefixed to each count
//! - [`StatusUpdater`] - The update routine shared by every trigger
//! - [`StatusUpdate`] - Show or hide, as handed to a display

mod format;
mod path;
mod summary;
mod updater;

pub use format::{format_changes, format_count, GlyphPreset, GlyphSet, ABBREVIATE_ABOVE};
pub use path::{host_path, host_path_for, is_drive_path, normalize_path};
pub use summary::ChangeSummary;
pub use updater::{StatusDisplay, StatusUpdate, StatusUpdater};
