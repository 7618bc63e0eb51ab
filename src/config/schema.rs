//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Graceful shutdown budget.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route table export.
    pub routes: RoutesConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long the listener may take to drain in-flight requests.
    pub grace_period_secs: u64,

    /// Upper bound for each teardown hook (exporter flush, etc.).
    pub teardown_timeout_secs: u64,
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    pub fn teardown_timeout(&self) -> Duration {
        Duration::from_secs(self.teardown_timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 30,
            teardown_timeout_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// OTLP trace export. Disabled when absent.
    pub otlp: Option<OtlpConfig>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            otlp: None,
        }
    }
}

/// OTLP exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtlpConfig {
    /// Collector gRPC endpoint (e.g., "http://localhost:4317").
    pub endpoint: String,

    /// Value of the `service.name` resource attribute.
    pub service_name: String,

    /// Fraction of root traces to sample (0.0 - 1.0).
    pub sampling_rate: f64,

    /// Exporter request timeout in seconds.
    pub export_timeout_secs: u64,
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4317".to_string(),
            service_name: "apm-api".to_string(),
            sampling_rate: 1.0,
            export_timeout_secs: 3,
        }
    }
}

/// Route table export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Where to write the registered routes as JSON at startup.
    pub export_path: Option<PathBuf>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            export_path: Some(PathBuf::from("routes.json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [shutdown]
            grace_period_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.shutdown.grace_period(), Duration::from_secs(5));
        assert_eq!(config.shutdown.teardown_timeout(), Duration::from_secs(10));
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.observability.otlp.is_none());
        assert_eq!(
            config.routes.export_path.as_deref(),
            Some(std::path::Path::new("routes.json"))
        );
    }

    #[test]
    fn routes_export_path_can_be_moved() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [routes]
            export_path = "/tmp/apm-routes.json"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.routes.export_path,
            Some(PathBuf::from("/tmp/apm-routes.json"))
        );
    }

    #[test]
    fn otlp_section_enables_export() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [observability]
            log_format = "json"

            [observability.otlp]
            endpoint = "http://collector:4317"
            sampling_rate = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.observability.log_format, LogFormat::Json);
        let otlp = config.observability.otlp.unwrap();
        assert_eq!(otlp.endpoint, "http://collector:4317");
        assert_eq!(otlp.service_name, "apm-api");
        assert_eq!(otlp.sampling_rate, 0.25);
    }
}
