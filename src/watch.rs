//! Paste-affordance monitor.
//!
//! Re-evaluates [`can_paste`] on a fixed interval and reports only
//! transitions, the way an Edit menu keeps its Paste item current. Each
//! evaluation runs to completion on a blocking worker; the loop itself
//! never caches a result. Runs until SIGINT/SIGTERM, which also cut
//! short an evaluation that is still waiting on the platform.

use std::future::Future;
use std::time::Duration;

use tokio::signal::unix::{SignalKind, signal};

use crate::editing::{ClipboardError, Frame, can_paste};

/// Watch errors.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("evaluation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Watch configuration, assembled from CLI arguments.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub interval: Duration,
}

/// Run the monitor until SIGINT or SIGTERM arrives.
///
/// `report` is called with the initial state and with every change.
pub async fn run<F>(frame: Frame, config: WatchConfig, report: F) -> Result<(), WatchError>
where
    F: FnMut(bool),
{
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
        }
    };

    run_until(frame, config, report, shutdown).await
}

/// Run the monitor until `shutdown` completes.
///
/// `shutdown` is polled during the wait between ticks and while an
/// evaluation is in flight. An abandoned evaluation keeps its blocking
/// worker until the platform call returns; its result is discarded.
pub async fn run_until<F, S>(
    frame: Frame,
    config: WatchConfig,
    mut report: F,
    shutdown: S,
) -> Result<(), WatchError>
where
    F: FnMut(bool),
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last: Option<bool> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let enabled = tokio::select! {
            _ = &mut shutdown => {
                tracing::debug!("shutdown during evaluation, result discarded");
                break;
            }
            result = evaluate(&frame) => result?,
        };

        if last != Some(enabled) {
            tracing::info!(enabled, "paste affordance changed");
            report(enabled);
            last = Some(enabled);
        }
    }

    Ok(())
}

/// One synchronous readiness check on a blocking worker.
async fn evaluate(frame: &Frame) -> Result<bool, WatchError> {
    let frame = frame.clone();
    let enabled = tokio::task::spawn_blocking(move || can_paste(&frame)).await??;
    Ok(enabled)
}
