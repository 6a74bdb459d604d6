//! Graceful shutdown on SIGTERM or Ctrl-C.
//!
//! Each signal is watched on its own, so failing to install one handler
//! leaves the other working.

use std::future::Future;

use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Resolves on the first SIGTERM, or never if the handler can't be installed.
async fn sigterm() {
    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("failed to install SIGTERM handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}

/// Resolves on the first Ctrl-C, or never if the handler can't be installed.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
}

/// Cancels `shutdown` on SIGTERM or Ctrl-C.
pub async fn cancel_on_signal(shutdown: CancellationToken) {
    cancel_on_first(shutdown, sigterm(), interrupt()).await;
}

/// Cancels `shutdown` when either signal future resolves and returns the
/// name of the signal that fired.
async fn cancel_on_first(
    shutdown: CancellationToken,
    sigterm: impl Future<Output = ()>,
    interrupt: impl Future<Output = ()>,
) -> &'static str {
    let received = tokio::select! {
        () = sigterm => "SIGTERM",
        () = interrupt => "SIGINT",
    };

    println!("{received} received, waiting to exit");
    shutdown.cancel();
    received
}
