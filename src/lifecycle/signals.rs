//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM; Ctrl-C off unix)
//! - Translate signals into a [`Shutdown`] trigger
//! - Release the registration when the subscription is dropped
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The first signal triggers shutdown; repeats are logged and ignored
//! - Handlers are registered eagerly so registration failures surface to the caller

use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// Live subscription to process termination signals.
///
/// Dropping it stops listening.
#[derive(Debug)]
pub struct SignalSubscription {
    task: JoinHandle<()>,
}

impl SignalSubscription {
    /// Start forwarding termination signals to `shutdown`.
    #[cfg(unix)]
    pub fn install(shutdown: Shutdown) -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        let task = tokio::spawn(async move {
            loop {
                let name = tokio::select! {
                    Some(()) = interrupt.recv() => "SIGINT",
                    Some(()) = terminate.recv() => "SIGTERM",
                    else => break,
                };
                forward(&shutdown, name);
            }
        });

        Ok(Self { task })
    }

    /// Start forwarding Ctrl-C to `shutdown`.
    #[cfg(not(unix))]
    pub fn install(shutdown: Shutdown) -> std::io::Result<Self> {
        let task = tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                forward(&shutdown, "ctrl-c");
            }
        });

        Ok(Self { task })
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn forward(shutdown: &Shutdown, signal: &'static str) {
    if shutdown.trigger() {
        tracing::info!(signal, "Shutdown signal received");
    } else {
        tracing::warn!(signal, "Shutdown already in progress, ignoring signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_signals_trigger_once() {
        let shutdown = Shutdown::new();
        forward(&shutdown, "SIGINT");
        assert!(shutdown.is_triggered());
        forward(&shutdown, "SIGINT");
        assert!(!shutdown.trigger());
    }

    #[tokio::test]
    async fn dropping_subscription_stops_listening() {
        let shutdown = Shutdown::new();
        let subscription = SignalSubscription::install(shutdown.clone()).unwrap();
        assert!(!subscription.task.is_finished());

        drop(subscription);
        tokio::task::yield_now().await;
        assert!(!shutdown.is_triggered());
    }
}
