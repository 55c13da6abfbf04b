use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use diffline_core::{StatusDisplay, StatusUpdater};
use diffline_git::build_source;
use diffline_watch::Trigger;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::config::Settings;

/// The updater plus the settings the run loop itself needs
pub struct Session {
    pub updater: StatusUpdater,
    pub debounce: Duration,
}

impl Session {
    pub fn from_settings(root: &Path, settings: &Settings) -> Self {
        let source = build_source(&settings.source_config());
        let updater = StatusUpdater::new(source, root.to_path_buf())
            .with_glyphs(settings.glyphs.clone());
        Self {
            updater,
            debounce: settings.debounce,
        }
    }
}

/// Process triggers one batch at a time until shutdown or until every sender is gone.
///
/// `reload` is called when a batch contains a config change; on failure the
/// current session is kept.
pub async fn run_loop<F>(
    mut session: Session,
    mut reload: F,
    display: &mut dyn StatusDisplay,
    rx: &mut UnboundedReceiver<Trigger>,
) where
    F: FnMut() -> Result<Session>,
{
    while let Some(first) = rx.recv().await {
        let batch = collect_batch(first, rx, session.debounce).await;

        if batch.iter().any(Trigger::is_shutdown) {
            debug!("Shutdown requested");
            display.hide();
            if let Err(e) = display.flush() {
                warn!(error = %e, "Failed to flush status display");
            }
            return;
        }

        if batch.iter().any(Trigger::is_config_change) {
            match reload() {
                Ok(next) => {
                    session = next;
                    info!(source = session.updater.source_name(), "Reloaded configuration");
                }
                Err(e) => warn!(error = %format!("{e:#}"), "Keeping previous configuration"),
            }
        }

        debug!(
            triggers = batch.len(),
            first = %batch[0],
            working_dir = %session.updater.working_dir().display(),
            "Running update"
        );
        session.updater.update(display).await;
    }
}

/// Gather triggers that arrive within `debounce` of `first` into one batch
async fn collect_batch(
    first: Trigger,
    rx: &mut UnboundedReceiver<Trigger>,
    debounce: Duration,
) -> Vec<Trigger> {
    let settle = matches!(first, Trigger::FileChanged { .. } | Trigger::ConfigChanged { .. });
    let mut batch = vec![first];

    if settle && !debounce.is_zero() {
        tokio::time::sleep(debounce).await;
    }
    while let Ok(trigger) = rx.try_recv() {
        batch.push(trigger);
    }
    batch
}
