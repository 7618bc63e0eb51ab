//! Startup, serve and shutdown sequencing for one service process.
//!
//! # Responsibilities
//! - Set up auxiliary subsystems before traffic is accepted
//! - Run the listener on a background task
//! - Race listener failure against the shutdown signal
//! - Stop the listener, then run teardown hooks, collecting every failure
//!
//! # Design Decisions
//! - Fail fast: a setup error skips serving entirely
//! - The listener reports its outcome through a oneshot; nothing else is shared
//! - Errors are returned, never logged here; the caller owns the exit code

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::config::ShutdownConfig;
use crate::lifecycle::error::{CompositeError, LifecycleError, ShutdownError};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::SignalSubscription;
use crate::lifecycle::state::{LifecyclePhase, LifecycleState};
use crate::lifecycle::teardown::TeardownHooks;
use crate::net::{Listener, ListenerError};
use crate::observability::Telemetry;

type ListenerOutcome = Result<Result<(), ListenerError>, oneshot::error::RecvError>;

/// Time budgets for the shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessOptions {
    /// How long the listener may take to drain after a stop request.
    pub grace_period: Duration,
    /// Upper bound for each teardown hook.
    pub teardown_timeout: Duration,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions::from(&ShutdownConfig::default())
    }
}

impl From<&ShutdownConfig> for HarnessOptions {
    fn from(config: &ShutdownConfig) -> Self {
        Self {
            grace_period: config.grace_period(),
            teardown_timeout: config.teardown_timeout(),
        }
    }
}

/// What ended the serve phase.
enum Trigger {
    ListenerExited(ListenerOutcome),
    ShutdownRequested,
}

/// Coordinates one run of a listener and its telemetry.
pub struct Harness<L, T> {
    listener: Arc<L>,
    telemetry: T,
    options: HarnessOptions,
    state: LifecycleState,
}

impl<L, T> Harness<L, T>
where
    L: Listener,
    T: Telemetry,
{
    pub fn new(listener: Arc<L>, telemetry: T, options: HarnessOptions) -> Self {
        Self {
            listener,
            telemetry,
            options,
            state: LifecycleState::new(),
        }
    }

    /// Handle for observing this harness's phase, usable after `run` consumes it.
    pub fn state(&self) -> LifecycleState {
        self.state.clone()
    }

    /// Run until SIGINT/SIGTERM, listening for signals only for the duration of the call.
    pub async fn run(self) -> Result<(), CompositeError> {
        let shutdown = Shutdown::new();
        let _signals = match SignalSubscription::install(shutdown.clone()) {
            Ok(subscription) => subscription,
            Err(e) => {
                let mut errors = CompositeError::new();
                errors.push(LifecycleError::Signal(e));
                return errors.into_result();
            }
        };
        self.run_with_shutdown(shutdown).await
    }

    /// Run until `shutdown` is triggered or the listener fails.
    pub async fn run_with_shutdown(self, shutdown: Shutdown) -> Result<(), CompositeError> {
        let mut errors = CompositeError::new();
        let mut hooks = TeardownHooks::new();

        self.state.transition(LifecyclePhase::Initializing);

        if let Err(e) = self.telemetry.setup(&shutdown, &mut hooks) {
            errors.push(LifecycleError::Setup(e));
            self.state.transition(LifecyclePhase::ShuttingDown);
            return self.finish(hooks, errors).await;
        }

        let (result_tx, mut result_rx) = oneshot::channel();
        let serve = self.listener.start();
        tokio::spawn(async move {
            // The harness may already have given up waiting on a stuck drain.
            let _ = result_tx.send(serve.await);
        });
        self.state.transition(LifecyclePhase::Serving);
        tracing::info!("Service running");

        let trigger = tokio::select! {
            biased;
            outcome = &mut result_rx => Trigger::ListenerExited(outcome),
            () = shutdown.triggered() => Trigger::ShutdownRequested,
        };

        self.state.transition(LifecyclePhase::ShuttingDown);

        match trigger {
            Trigger::ListenerExited(outcome) => errors.record(flatten(outcome)),
            Trigger::ShutdownRequested => {
                tracing::info!(
                    grace_period = ?self.options.grace_period,
                    "Shutdown requested, stopping listener"
                );
                self.stop_listener(result_rx, &mut errors).await;
            }
        }

        self.finish(hooks, errors).await
    }

    async fn stop_listener(
        &self,
        result_rx: oneshot::Receiver<Result<(), ListenerError>>,
        errors: &mut CompositeError,
    ) {
        if let Err(e) = self.listener.request_stop() {
            errors.push(ShutdownError::StopRejected(e));
            return;
        }

        match tokio::time::timeout(self.options.grace_period, result_rx).await {
            Ok(outcome) => errors.record(flatten(outcome)),
            Err(_) => errors.push(ShutdownError::GracePeriodElapsed(self.options.grace_period)),
        }
    }

    async fn finish(
        &self,
        mut hooks: TeardownHooks,
        mut errors: CompositeError,
    ) -> Result<(), CompositeError> {
        hooks.run_all(self.options.teardown_timeout, &mut errors).await;
        self.state.transition(LifecyclePhase::Terminated);
        tracing::info!(failures = errors.len(), "Lifecycle terminated");
        errors.into_result()
    }
}

fn flatten(outcome: ListenerOutcome) -> Result<(), ListenerError> {
    outcome.unwrap_or(Err(ListenerError::Aborted))
}
