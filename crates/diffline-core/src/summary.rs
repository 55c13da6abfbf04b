use regex::Regex;
use serde::Serialize;
use std::num::ParseIntError;
use std::sync::LazyLock;
use tracing::debug;

use crate::format::{format_changes, GlyphSet};

static INSERTIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+) insertion").unwrap());
static DELETIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+) deletion").unwrap());
static FILES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+) file").unwrap());

/// Line and file counts extracted from a diff summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub added: u64,
    pub removed: u64,
    pub files_changed: u64,
    /// The text the counts were parsed from, kept verbatim
    pub raw_text: String,
}

impl ChangeSummary {
    /// Parse `git diff --shortstat` style text.
    ///
    /// Returns `None` when there is nothing to show: empty output, text
    /// that mentions none of insertions, deletions or files, or a count
    /// too large to represent. A category missing from the text counts as 0.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }

        match extract_counts(raw) {
            Ok([None, None, None]) => {
                debug!(raw = %raw.trim(), "No diff summary found in output");
                None
            }
            Ok([added, removed, files_changed]) => Some(Self {
                added: added.unwrap_or(0),
                removed: removed.unwrap_or(0),
                files_changed: files_changed.unwrap_or(0),
                raw_text: raw.to_string(),
            }),
            Err(e) => {
                debug!(error = %e, raw = %raw.trim(), "Failed to parse diff summary");
                None
            }
        }
    }

    /// Label using the default glyphs
    pub fn label(&self) -> String {
        format_changes(self, &GlyphSet::default())
    }
}

fn extract_counts(raw: &str) -> Result<[Option<u64>; 3], ParseIntError> {
    Ok([
        capture_count(&INSERTIONS, raw)?,
        capture_count(&DELETIONS, raw)?,
        capture_count(&FILES, raw)?,
    ])
}

fn capture_count(re: &Regex, text: &str) -> Result<Option<u64>, ParseIntError> {
    match re.captures(text).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().parse().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_none() {
        assert_eq!(ChangeSummary::parse(""), None);
        assert_eq!(ChangeSummary::parse("   \n"), None);
    }

    #[test]
    fn test_parse_full_summary() {
        let raw = " 2 files changed, 10 insertions(+), 3 deletions(-)";
        let summary = ChangeSummary::parse(raw).unwrap();
        assert_eq!(summary.added, 10);
        assert_eq!(summary.removed, 3);
        assert_eq!(summary.files_changed, 2);
        assert_eq!(summary.raw_text, raw);
    }

    #[test]
    fn test_parse_missing_deletions_defaults_to_zero() {
        let summary = ChangeSummary::parse(" 1 file changed, 5 insertions(+)").unwrap();
        assert_eq!(summary.added, 5);
        assert_eq!(summary.removed, 0);
        assert_eq!(summary.files_changed, 1);
    }

    #[test]
    fn test_parse_singular_forms() {
        let summary =
            ChangeSummary::parse(" 1 file changed, 1 insertion(+), 1 deletion(-)\n").unwrap();
        assert_eq!((summary.added, summary.removed, summary.files_changed), (1, 1, 1));
    }

    #[test]
    fn test_parse_only_deletions() {
        let summary = ChangeSummary::parse(" 3 files changed, 120 deletions(-)").unwrap();
        assert_eq!(summary.added, 0);
        assert_eq!(summary.removed, 120);
        assert_eq!(summary.files_changed, 3);
    }

    #[test]
    fn test_parse_multi_digit_counts() {
        let summary =
            ChangeSummary::parse(" 48 files changed, 12345 insertions(+), 6789 deletions(-)")
                .unwrap();
        assert_eq!(summary.added, 12345);
        assert_eq!(summary.removed, 6789);
        assert_eq!(summary.files_changed, 48);
    }

    #[test]
    fn test_parse_unrelated_text_is_none() {
        assert_eq!(ChangeSummary::parse("warning: not a git repository"), None);
    }

    #[test]
    fn test_parse_overflow_is_none_not_partial() {
        let raw = " 1 file changed, 99999999999999999999999 insertions(+), 2 deletions(-)";
        assert_eq!(ChangeSummary::parse(raw), None);
    }

    #[test]
    fn test_label_uses_default_glyphs() {
        let summary = ChangeSummary::parse(" 2 files changed, 10 insertions(+), 3 deletions(-)")
            .unwrap();
        assert_eq!(summary.label(), "$(diff-added) 10 $(diff-removed) 3 $(file) 2");
    }
}
