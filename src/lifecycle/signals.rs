//! OS signal handling.

use std::future::Future;
use std::io;

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Resolve on Ctrl+C (SIGINT).
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C; shutting down"),
    }
}

/// Drive `server` until it exits or `signal` resolves, whichever is first.
///
/// Either way `shutdown` is triggered so sibling tasks stop. On a signal
/// the server is given the chance to drain before returning; a server that
/// exits on its own has its result returned immediately.
pub async fn supervise<S>(
    mut server: JoinHandle<io::Result<()>>,
    shutdown: &Shutdown,
    signal: S,
) -> io::Result<()>
where
    S: Future<Output = ()>,
{
    let served = tokio::select! {
        served = &mut server => {
            tracing::warn!("HTTP server exited before shutdown was requested");
            shutdown.trigger();
            served
        }
        () = signal => {
            shutdown.trigger();
            server.await
        }
    };
    served.map_err(io::Error::other)?
}
