//! apm-api
//!
//! A "hello world" HTTP service built with Tokio and Axum, traced over OTLP and
//! shut down gracefully on SIGINT/SIGTERM.
//!
//! # Architecture Overview
//!
//! ```text
//!   main ── config ── logging
//!     │
//!     ▼
//!   ┌──────────────────────────── lifecycle::Harness ───────────────────────────┐
//!   │                                                                           │
//!   │  telemetry.setup ──▶ spawn(listener.start) ──▶ select! { outcome, signal } │
//!   │        │                                              │                   │
//!   │        ▼                                              ▼                   │
//!   │  teardown hooks ◀──────────── drain ◀──── listener.request_stop           │
//!   │                                                                           │
//!   └──────────────────────────────── CompositeError ───────────────────────────┘
//!     │
//!     ▼
//!   exit code
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use apm_api::config::{load_config, ServiceConfig};
use apm_api::http::{export_routes, HttpServer};
use apm_api::lifecycle::{Harness, HarnessOptions};
use apm_api::observability::{logging, metrics, OtlpTelemetry};

#[derive(Parser)]
#[command(name = "apm-api")]
#[command(about = "Hello world HTTP service with traced, graceful lifecycle", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the registered routes to this file as JSON at startup.
    #[arg(long)]
    export_routes: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(load_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            // Logging is configured from this file, so it is not up yet.
            eprintln!("apm-api: invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let otel_slot = match logging::init(&config.observability) {
        Ok(slot) => slot,
        Err(e) => {
            eprintln!("apm-api: failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("apm-api v{} starting", env!("CARGO_PKG_VERSION"));
    log_config(&config);

    let metrics_handle = if config.observability.metrics_enabled {
        match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder, /metrics disabled");
                None
            }
        }
    } else {
        None
    };

    let server = HttpServer::new(&config, metrics_handle);

    if let Some(path) = cli.export_routes.or_else(|| config.routes.export_path.clone()) {
        match export_routes(server.routes(), &path) {
            Ok(()) => tracing::info!(path = %path.display(), "Routes exported"),
            Err(e) => tracing::warn!(error = %e, "Failed to export routes"),
        }
    }

    let telemetry = OtlpTelemetry::new(config.observability.otlp.clone(), otel_slot);
    let harness = Harness::new(
        Arc::new(server),
        telemetry,
        HarnessOptions::from(&config.shutdown),
    );

    match harness.run().await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for error in &errors {
                tracing::error!(error = %error, "Service terminated with error");
            }
            ExitCode::FAILURE
        }
    }
}

fn log_config(config: &ServiceConfig) {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        grace_period_secs = config.shutdown.grace_period_secs,
        teardown_timeout_secs = config.shutdown.teardown_timeout_secs,
        metrics_enabled = config.observability.metrics_enabled,
        otlp_enabled = config.observability.otlp.is_some(),
        "Configuration loaded"
    );
}
