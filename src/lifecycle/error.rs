//! Lifecycle error types returned by the harness.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::net::ListenerError;
use crate::observability::TelemetryError;

/// A single failure observed during a harness run.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// An auxiliary subsystem failed to initialize; the listener was never started.
    #[error("telemetry setup failed: {0}")]
    Setup(#[from] TelemetryError),

    /// The listener failed to bind, or failed while serving or draining.
    #[error("listener failed: {0}")]
    Listen(#[from] ListenerError),

    /// Stopping the listener or running a teardown hook failed.
    #[error("shutdown failed: {0}")]
    Shutdown(#[from] ShutdownError),

    /// The OS signal subscription could not be installed.
    #[error("failed to subscribe to OS signals: {0}")]
    Signal(#[source] std::io::Error),
}

/// Failures of the shutdown sequence itself.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("listener refused the stop request: {0}")]
    StopRejected(#[source] ListenerError),

    #[error("listener did not drain within {0:?}")]
    GracePeriodElapsed(Duration),

    #[error("teardown hook '{name}' failed: {source}")]
    HookFailed {
        name: &'static str,
        #[source]
        source: TelemetryError,
    },

    #[error("teardown hook '{name}' did not finish within {timeout:?}")]
    HookTimedOut {
        name: &'static str,
        timeout: Duration,
    },
}

/// Zero or more independent failures, kept in the order they were observed.
///
/// The first entry is the primary cause; later entries come from the shutdown
/// sequence and never replace it.
#[derive(Debug, Default)]
pub struct CompositeError {
    errors: Vec<LifecycleError>,
}

impl CompositeError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<LifecycleError>) {
        self.errors.push(error.into());
    }

    /// Append the error of a fallible step, if any.
    pub fn record<E: Into<LifecycleError>>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            self.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The error that determined the terminal path.
    pub fn primary(&self) -> Option<&LifecycleError> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LifecycleError> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> Vec<LifecycleError> {
        self.errors
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompositeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.primary().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl<'a> IntoIterator for &'a CompositeError {
    type Item = &'a LifecycleError;
    type IntoIter = std::slice::Iter<'a, LifecycleError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
