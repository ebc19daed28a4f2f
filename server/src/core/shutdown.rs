//! Centralized shutdown management

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::constants::SHUTDOWN_TIMEOUT_SECS;

/// Shutdown signal shared by the HTTP server and the signal handlers
#[derive(Clone)]
pub struct ShutdownService {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    drain_timeout: Duration,
}

impl Default for ShutdownService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownService {
    pub fn new() -> Self {
        Self::with_drain_timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
    }

    pub fn with_drain_timeout(drain_timeout: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
            drain_timeout,
        }
    }

    /// Trigger shutdown
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Check if shutdown was triggered
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal (for use with axum graceful shutdown)
    /// Returns an owned future that can be passed to graceful_shutdown
    pub fn wait(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.rx.clone();
        async move {
            let _ = rx.wait_for(|&v| v).await;
        }
    }

    /// Resolves once the drain timeout has elapsed after the signal
    pub fn drain_deadline(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let wait = self.wait();
        let timeout = self.drain_timeout;
        async move {
            wait.await;
            tokio::time::sleep(timeout).await;
        }
    }

    /// Install OS signal handlers and auto-trigger on Ctrl+C/SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                        tracing::error!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
                _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
            }

            service.trigger();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_not_triggered_initially() {
        let shutdown = ShutdownService::new();
        assert!(!shutdown.is_triggered());
    }

    #[test]
    fn test_shutdown_trigger_is_shared_by_clones() {
        let shutdown = ShutdownService::new();
        let clone = shutdown.clone();
        clone.trigger();
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_shutdown_wait_returns_after_trigger() {
        let shutdown = ShutdownService::new();
        let handle = tokio::spawn(shutdown.wait());

        tokio::task::yield_now().await;
        shutdown.trigger();

        tokio::time::timeout(Duration::from_millis(100), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_drain_deadline_waits_for_signal() {
        let shutdown = ShutdownService::with_drain_timeout(Duration::from_millis(10));
        let deadline = tokio::spawn(shutdown.drain_deadline());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!deadline.is_finished());

        shutdown.trigger();
        tokio::time::timeout(Duration::from_millis(200), deadline)
            .await
            .unwrap()
            .unwrap();
    }
}
