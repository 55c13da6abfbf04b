use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::Trigger;

/// Queue a manual update for every line read from stdin.
///
/// The task ends quietly when stdin closes.
pub fn spawn_stdin_trigger(tx: UnboundedSender<Trigger>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if tx.send(Trigger::Manual).is_err() {
                break;
            }
        }
        debug!("stdin closed, manual refresh via stdin disabled");
    })
}

/// Queue a manual update on every `SIGUSR1`
#[cfg(unix)]
pub fn spawn_signal_trigger(tx: UnboundedSender<Trigger>) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut usr1 = signal(SignalKind::user_defined1())?;
    Ok(tokio::spawn(async move {
        while usr1.recv().await.is_some() {
            if tx.send(Trigger::Manual).is_err() {
                break;
            }
        }
    }))
}
