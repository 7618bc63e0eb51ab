//! Teardown hooks registered by auxiliary subsystems.
//!
//! Hooks run in reverse registration order, each at most once, each bounded by
//! a timeout. Failures are appended to the run's [`CompositeError`].

use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::lifecycle::error::{CompositeError, ShutdownError};
use crate::observability::TelemetryError;

type HookFn = Box<dyn FnOnce(Duration) -> BoxFuture<'static, Result<(), TelemetryError>> + Send>;

struct TeardownHook {
    name: &'static str,
    run: HookFn,
}

/// Registry of pending teardown hooks.
#[derive(Default)]
pub struct TeardownHooks {
    hooks: Vec<TeardownHook>,
}

impl TeardownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook. It receives the time it is allowed to take.
    pub fn register<F, Fut>(&mut self, name: &'static str, hook: F)
    where
        F: FnOnce(Duration) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TelemetryError>> + Send + 'static,
    {
        tracing::debug!(hook = name, "Teardown hook registered");
        self.hooks.push(TeardownHook {
            name,
            run: Box::new(move |deadline| hook(deadline).boxed()),
        });
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every pending hook, newest first, recording failures into `errors`.
    ///
    /// Hooks are consumed; calling this again only runs hooks registered since.
    pub async fn run_all(&mut self, timeout: Duration, errors: &mut CompositeError) {
        while let Some(TeardownHook { name, run }) = self.hooks.pop() {
            tracing::debug!(hook = name, "Running teardown hook");
            match tokio::time::timeout(timeout, run(timeout)).await {
                Ok(Ok(())) => {}
                Ok(Err(source)) => errors.push(ShutdownError::HookFailed { name, source }),
                Err(_) => errors.push(ShutdownError::HookTimedOut { name, timeout }),
            }
        }
    }
}

impl Drop for TeardownHooks {
    fn drop(&mut self) {
        if !self.hooks.is_empty() {
            let names: Vec<_> = self.hooks.iter().map(|h| h.name).collect();
            tracing::warn!(hooks = ?names, "Teardown hooks dropped without running");
        }
    }
}

impl std::fmt::Debug for TeardownHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.hooks.iter().map(|h| h.name)).finish()
    }
}
