use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use diffline_git::DiffSource;

use crate::{format_changes, ChangeSummary, GlyphSet};

/// What a status display should do after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusUpdate {
    Show { label: String, tooltip: String },
    Hide,
}

impl StatusUpdate {
    pub fn from_summary(summary: Option<ChangeSummary>, glyphs: &GlyphSet) -> Self {
        match summary {
            Some(summary) => Self::Show {
                label: format_changes(&summary, glyphs),
                tooltip: summary.raw_text,
            },
            None => Self::Hide,
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Show { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Show { label, .. } => Some(label),
            Self::Hide => None,
        }
    }
}

/// A persistent place to show a short label and optional detail text
pub trait StatusDisplay: Send {
    fn show(&mut self, label: &str, tooltip: &str);

    fn hide(&mut self);

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn apply(&mut self, update: &StatusUpdate) {
        match update {
            StatusUpdate::Show { label, tooltip } => self.show(label, tooltip),
            StatusUpdate::Hide => self.hide(),
        }
    }
}

/// The update routine every trigger re-runs
pub struct StatusUpdater {
    source: Box<dyn DiffSource>,
    working_dir: PathBuf,
    glyphs: GlyphSet,
}

impl StatusUpdater {
    pub fn new(source: Box<dyn DiffSource>, working_dir: PathBuf) -> Self {
        Self {
            source,
            working_dir,
            glyphs: GlyphSet::default(),
        }
    }

    pub fn with_glyphs(mut self, glyphs: GlyphSet) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Run the source and turn its output into a show/hide decision.
    /// Source failures are logged and hide the display.
    pub async fn compute(&self) -> StatusUpdate {
        match self.source.shortstat(&self.working_dir).await {
            Ok(text) => {
                let update = StatusUpdate::from_summary(ChangeSummary::parse(&text), &self.glyphs);
                debug!(
                    source = self.source.name(),
                    visible = update.is_visible(),
                    label = update.label().unwrap_or(""),
                    "Computed status"
                );
                update
            }
            Err(e) => {
                warn!(
                    error = %e,
                    source = self.source.name(),
                    working_dir = %self.working_dir.display(),
                    "cannot show stats"
                );
                StatusUpdate::Hide
            }
        }
    }

    /// Compute an update and apply it to `display`
    pub async fn update(&self, display: &mut dyn StatusDisplay) -> StatusUpdate {
        let update = self.compute().await;
        display.apply(&update);
        if let Err(e) = display.flush() {
            warn!(error = %e, "Failed to flush status display");
        }
        update
    }
}
