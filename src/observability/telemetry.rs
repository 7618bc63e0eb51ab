//! Auxiliary telemetry subsystem interface.

use thiserror::Error;

use crate::lifecycle::{Shutdown, TeardownHooks};

/// Errors raised while setting up or tearing down telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The exporter pipeline could not be built.
    #[error("failed to install trace pipeline: {0}")]
    Pipeline(#[from] opentelemetry::trace::TraceError),

    /// The tracing layer could not be attached to the subscriber.
    #[error("failed to attach tracing layer: {0}")]
    Layer(#[from] tracing_subscriber::reload::Error),

    /// Shutdown was requested before setup ran.
    #[error("setup cancelled by shutdown")]
    Cancelled,

    /// The exporter reported a failure while flushing or shutting down.
    #[error("exporter failed: {0}")]
    Export(String),
}

/// A subsystem that must be ready before the listener starts and flushed after it stops.
pub trait Telemetry: Send + Sync {
    /// Acquire resources, registering a teardown hook for each one acquired.
    ///
    /// Hooks registered before a failure still run.
    fn setup(&self, shutdown: &Shutdown, hooks: &mut TeardownHooks) -> Result<(), TelemetryError>;
}
