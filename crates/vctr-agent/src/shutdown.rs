// SPDX-FileCopyrightText: 2026 VCTR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the HTTP server and background tasks monitor.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
/// If the SIGTERM handler cannot be installed, only Ctrl+C triggers shutdown.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => {}
            _ = token_clone.cancelled() => {
                debug!("shutdown requested without a signal");
                return;
            }
        }
        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
                let _ = ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}

/// Waits for `task` to finish after shutdown, giving up after `timeout`.
///
/// Returns true when the task completed in time.
pub async fn drain<F>(task: F, timeout: Duration) -> bool
where
    F: std::future::Future,
{
    match tokio::time::timeout(timeout, task).await {
        Ok(_) => {
            info!("in-flight requests drained");
            true
        }
        Err(_) => {
            warn!(?timeout, "drain timeout reached, abandoning in-flight requests");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_signal_handler_returns_token() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
    }

    #[tokio::test]
    async fn drain_finishes_quick_tasks() {
        assert!(drain(async {}, Duration::from_millis(50)).await);
    }

    #[tokio::test]
    async fn drain_gives_up_on_stuck_tasks() {
        let stuck = std::future::pending::<()>();
        assert!(!drain(stuck, Duration::from_millis(10)).await);
    }
}
