//! Ctrl+C / SIGTERM handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::warn;

/// Clear `running` once a shutdown signal arrives
///
/// Abort the returned handle when the run ends on its own.
pub fn spawn_shutdown_listener(running: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Received shutdown signal, stopping replay...");
        running.store(false, Ordering::SeqCst);
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
