//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use apm_api::config::ServiceConfig;
use apm_api::lifecycle::{Shutdown, TeardownHooks};
use apm_api::observability::{Telemetry, TelemetryError};

/// Reserve a loopback port that is free right now.
pub fn free_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Config bound to `addr` with short shutdown budgets.
pub fn test_config(addr: SocketAddr) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = addr.to_string();
    config.shutdown.grace_period_secs = 5;
    config.shutdown.teardown_timeout_secs = 2;
    config.observability.metrics_enabled = false;
    config
}

/// Telemetry double that counts how often its teardown hook runs.
#[derive(Clone, Default)]
pub struct RecordingTelemetry {
    pub fail_setup: bool,
    pub teardowns: Arc<AtomicUsize>,
}

impl RecordingTelemetry {
    pub fn teardown_count(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

impl Telemetry for RecordingTelemetry {
    fn setup(&self, _shutdown: &Shutdown, hooks: &mut TeardownHooks) -> Result<(), TelemetryError> {
        if self.fail_setup {
            return Err(TelemetryError::Export("collector unreachable".into()));
        }
        let teardowns = self.teardowns.clone();
        hooks.register("recording", move |_| async move {
            teardowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        Ok(())
    }
}

/// Poll `url` until it answers or `attempts` run out.
pub async fn wait_until_serving(client: &reqwest::Client, url: &str, attempts: usize) -> bool {
    for _ in 0..attempts {
        if client.get(url).send().await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
