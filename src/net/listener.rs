//! Listener collaborator interface.
//!
//! # Responsibilities
//! - Describe the network-accepting subsystem the harness drives
//! - Classify bind, serve and stop failures
//!
//! # Design Decisions
//! - `start` hands back an owned future so the harness can run it on its own task
//! - `request_stop` only asks; the harness waits for the drain on the result conduit

use std::future::Future;

use thiserror::Error;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed while serving.
    #[error("failed while serving: {0}")]
    Serve(#[source] std::io::Error),

    /// `start` was called on a listener that already started.
    #[error("listener already started")]
    AlreadyStarted,

    /// A stop was requested before the listener started.
    #[error("listener is not running")]
    NotRunning,

    /// Serving ended although nobody asked it to stop.
    #[error("listener stopped without being asked to")]
    Exited,

    /// The serving task ended without reporting an outcome (panic or abort).
    #[error("listener task ended without reporting an outcome")]
    Aborted,
}

/// A network listener that can be started in the background and asked to stop.
pub trait Listener: Send + Sync + 'static {
    /// Bind and serve until stopped.
    ///
    /// Resolves with `Ok(())` after a requested stop has drained, or with the
    /// failure that ended serving.
    fn start(&self) -> impl Future<Output = Result<(), ListenerError>> + Send + 'static;

    /// Stop accepting new connections and let in-flight ones finish.
    fn request_stop(&self) -> Result<(), ListenerError>;
}
