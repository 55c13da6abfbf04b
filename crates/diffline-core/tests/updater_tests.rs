use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use diffline_core::{GlyphPreset, GlyphSet, StatusDisplay, StatusUpdate, StatusUpdater};
use diffline_git::{DiffSource, GitError};

/// Source that replays a fixed result and counts invocations.
struct FixedSource {
    output: Option<String>,
    calls: AtomicUsize,
}

impl FixedSource {
    fn ok(text: &str) -> Self {
        Self {
            output: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            output: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DiffSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn shortstat(&self, _dir: &Path) -> Result<String, GitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.output {
            Some(text) => Ok(text.clone()),
            None => Err(GitError::CommandFailed {
                code: 128,
                stderr: "fatal: not a git repository".to_string(),
            }),
        }
    }
}

/// Display that records every call.
#[derive(Default)]
struct RecordingDisplay {
    calls: Vec<String>,
}

impl StatusDisplay for RecordingDisplay {
    fn show(&mut self, label: &str, tooltip: &str) {
        self.calls.push(format!("show:{label}|{tooltip}"));
    }

    fn hide(&mut self) {
        self.calls.push("hide".to_string());
    }
}

fn updater(source: FixedSource) -> StatusUpdater {
    StatusUpdater::new(Box::new(source), PathBuf::from("/workspace"))
}

#[tokio::test]
async fn test_update_shows_formatted_label() {
    let raw = " 2 files changed, 10 insertions(+), 3 deletions(-)\n";
    let updater = updater(FixedSource::ok(raw));
    let mut display = RecordingDisplay::default();

    let update = updater.update(&mut display).await;

    assert_eq!(
        update,
        StatusUpdate::Show {
            label: "$(diff-added) 10 $(diff-removed) 3 $(file) 2".to_string(),
            tooltip: raw.to_string(),
        }
    );
    assert_eq!(
        display.calls,
        vec![format!(
            "show:$(diff-added) 10 $(diff-removed) 3 $(file) 2|{raw}"
        )]
    );
}

#[tokio::test]
async fn test_empty_output_hides() {
    let updater = updater(FixedSource::ok(""));
    let mut display = RecordingDisplay::default();

    let update = updater.update(&mut display).await;

    assert_eq!(update, StatusUpdate::Hide);
    assert_eq!(display.calls, vec!["hide"]);
}

#[tokio::test]
async fn test_source_failure_hides() {
    let updater = updater(FixedSource::failing());
    let mut display = RecordingDisplay::default();

    let update = updater.update(&mut display).await;

    assert!(!update.is_visible());
    assert_eq!(display.calls, vec!["hide"]);
}

#[tokio::test]
async fn test_update_is_idempotent() {
    let updater = updater(FixedSource::ok(" 1 file changed, 5 insertions(+)"));
    let mut display = RecordingDisplay::default();

    let first = updater.update(&mut display).await;
    let second = updater.update(&mut display).await;

    assert_eq!(first, second);
    assert_eq!(display.calls.len(), 2);
    assert_eq!(display.calls[0], display.calls[1]);
}

#[tokio::test]
async fn test_custom_glyphs() {
    let updater = updater(FixedSource::ok(" 1 file changed, 1500 insertions(+)"))
        .with_glyphs(GlyphSet::from_preset(GlyphPreset::Ascii));

    let update = updater.compute().await;

    assert_eq!(update.label(), Some("+ 1500.0 - 0 ~ 1"));
}

#[tokio::test]
async fn test_each_update_runs_the_source() {
    let source = FixedSource::ok(" 1 file changed, 1 deletion(-)");
    let updater = StatusUpdater::new(Box::new(source), PathBuf::from("."));
    let mut display = RecordingDisplay::default();

    for _ in 0..3 {
        updater.update(&mut display).await;
    }

    assert_eq!(display.calls.len(), 3);
    assert_eq!(updater.source_name(), "fixed");
}
