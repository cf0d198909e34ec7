//! Graceful shutdown on Ctrl+C or SIGTERM

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    pub fn shutdown(&self) {
        let _ = self.sender.send(());
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Spawn a listener for Ctrl+C and SIGTERM and return the signal it fires
pub async fn wait_for_shutdown_signal() -> ShutdownSignal {
    let shutdown = ShutdownSignal::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = ctrl_c() => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
            }
            _ = terminate() => {
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }

        shutdown_clone.shutdown();
    });

    shutdown
}

/// Waits for the shutdown signal, then bounds how long draining may take
pub struct GracefulShutdown {
    shutdown_signal: ShutdownSignal,
    shutdown_timeout: Duration,
}

impl GracefulShutdown {
    pub fn new(shutdown_signal: ShutdownSignal, shutdown_timeout: Duration) -> Self {
        Self {
            shutdown_signal,
            shutdown_timeout,
        }
    }

    pub async fn wait_for_signal(&self) {
        let mut receiver = self.shutdown_signal.subscribe();
        let _ = receiver.recv().await;
        info!(
            "Shutdown initiated, waiting up to {:?} for connections to close...",
            self.shutdown_timeout
        );
    }

    /// Run `stop` within the grace period. Returns false when it timed out.
    pub async fn drain<F>(&self, stop: F) -> bool
    where
        F: std::future::Future<Output = ()>,
    {
        match tokio::time::timeout(self.shutdown_timeout, stop).await {
            Ok(()) => {
                info!("Shutdown complete");
                true
            }
            Err(_) => {
                warn!(
                    "Connections still open after {:?}, forcing shutdown",
                    self.shutdown_timeout
                );
                false
            }
        }
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.shutdown_signal.clone()
    }
}

/// Run a future unless shutdown is signalled first
pub async fn run_with_shutdown<F, T>(
    future: F,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = future => Some(result),
        _ = shutdown_rx.recv() => {
            warn!("Shutdown signal received, cancelling operation");
            None
        }
    }
}
