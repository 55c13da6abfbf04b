use serde::{Deserialize, Serialize};

use crate::ChangeSummary;

/// Counts above this render with one decimal place
pub const ABBREVIATE_ABOVE: u64 = 1000;

/// Built-in glyph sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphPreset {
    /// Editor icon tokens, rendered by hosts that understand `$(name)`
    #[default]
    Codicon,
    /// Plain characters for terminals
    Ascii,
}

impl std::fmt::Display for GlyphPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphPreset::Codicon => write!(f, "codicon"),
            GlyphPreset::Ascii => write!(f, "ascii"),
        }
    }
}

impl std::str::FromStr for GlyphPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "codicon" | "codicons" => Ok(GlyphPreset::Codicon),
            "ascii" | "plain" => Ok(GlyphPreset::Ascii),
            _ => Err(format!("Unknown glyph preset: {}", s)),
        }
    }
}

/// Tokens prefixed to the added, removed and files-changed counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphSet {
    pub added: String,
    pub removed: String,
    pub files: String,
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::from_preset(GlyphPreset::default())
    }
}

impl GlyphSet {
    pub fn from_preset(preset: GlyphPreset) -> Self {
        match preset {
            GlyphPreset::Codicon => Self {
                added: "$(diff-added)".to_string(),
                removed: "$(diff-removed)".to_string(),
                files: "$(file)".to_string(),
            },
            GlyphPreset::Ascii => Self {
                added: "+".to_string(),
                removed: "-".to_string(),
                files: "~".to_string(),
            },
        }
    }

    pub fn with_added(mut self, glyph: impl Into<String>) -> Self {
        self.added = glyph.into();
        self
    }

    pub fn with_removed(mut self, glyph: impl Into<String>) -> Self {
        self.removed = glyph.into();
        self
    }

    pub fn with_files(mut self, glyph: impl Into<String>) -> Self {
        self.files = glyph.into();
        self
    }
}

/// Render a count for display.
///
/// Counts up to [`ABBREVIATE_ABOVE`] are plain integers. Larger counts are
/// shown with one decimal place and no magnitude suffix, so 1532 renders
/// as `1532.0`.
pub fn format_count(count: u64) -> String {
    if count > ABBREVIATE_ABOVE {
        format!("{:.1}", count as f64)
    } else {
        count.to_string()
    }
}

/// Render `<added> <n> <removed> <n> <files> <n>`
pub fn format_changes(summary: &ChangeSummary, glyphs: &GlyphSet) -> String {
    [
        (&glyphs.added, summary.added),
        (&glyphs.removed, summary.removed),
        (&glyphs.files, summary.files_changed),
    ]
    .iter()
    .map(|(glyph, count)| format!("{} {}", glyph, format_count(*count)))
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(added: u64, removed: u64, files_changed: u64) -> ChangeSummary {
        ChangeSummary {
            added,
            removed,
            files_changed,
            raw_text: "...".to_string(),
        }
    }

    #[test]
    fn test_format_count_threshold() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(42), "42");
        assert_eq!(format_count(1000), "1000");
        assert_eq!(format_count(1001), "1001.0");
        assert_eq!(format_count(1532), "1532.0");
    }

    #[test]
    fn test_format_plain_counts() {
        let label = format_changes(&summary(10, 3, 2), &GlyphSet::default());
        assert_eq!(label, "$(diff-added) 10 $(diff-removed) 3 $(file) 2");
    }

    #[test]
    fn test_format_large_added_count() {
        let label = format_changes(&summary(1500, 0, 1), &GlyphSet::default());
        assert_eq!(label, "$(diff-added) 1500.0 $(diff-removed) 0 $(file) 1");
    }

    #[test]
    fn test_format_ascii_preset() {
        let glyphs = GlyphSet::from_preset(GlyphPreset::Ascii);
        assert_eq!(format_changes(&summary(7, 2, 1), &glyphs), "+ 7 - 2 ~ 1");
    }

    #[test]
    fn test_glyph_overrides() {
        let glyphs = GlyphSet::from_preset(GlyphPreset::Ascii)
            .with_added("A")
            .with_files("F");
        assert_eq!(format_changes(&summary(1, 2, 3), &glyphs), "A 1 - 2 F 3");
    }

    #[test]
    fn test_added_segment_round_trips_below_threshold() {
        let glyphs = GlyphSet::default();
        for added in [0u64, 1, 9, 10, 99, 500, 999, 1000] {
            for (removed, files) in [(0u64, 0u64), (3, 1), (1000, 77), (5000, 12)] {
                let label = format_changes(&summary(added, removed, files), &glyphs);
                let segment = label
                    .strip_prefix(&format!("{} ", glyphs.added))
                    .and_then(|rest| rest.split(' ').next())
                    .unwrap();
                assert_eq!(segment.parse::<u64>().unwrap(), added, "label: {label}");
            }
        }
    }

    #[test]
    fn test_glyph_preset_from_str() {
        assert_eq!("ASCII".parse::<GlyphPreset>().unwrap(), GlyphPreset::Ascii);
        assert_eq!("codicon".parse::<GlyphPreset>().unwrap(), GlyphPreset::Codicon);
        assert!("emoji".parse::<GlyphPreset>().is_err());
    }
}
