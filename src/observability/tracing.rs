//! Distributed tracing export.
//!
//! # Responsibilities
//! - Build the OTLP batch pipeline when configured
//! - Attach it to the subscriber so request spans are exported
//! - Flush and shut the provider down on teardown
//!
//! # Design Decisions
//! - Optional: export disabled unless `[observability.otlp]` is present
//! - The teardown hook is registered as soon as the provider exists, before attaching

use std::time::Duration;

use opentelemetry::{global, KeyValue, Value};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{BatchConfig, RandomIdGenerator, Sampler, Tracer, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};

use crate::config::OtlpConfig;
use crate::lifecycle::{Shutdown, TeardownHooks};
use crate::observability::logging::OtelSlot;
use crate::observability::telemetry::{Telemetry, TelemetryError};

/// OTLP trace exporter, set up by the harness before the listener starts.
#[derive(Debug, Clone)]
pub struct OtlpTelemetry {
    config: Option<OtlpConfig>,
    slot: OtelSlot,
}

impl OtlpTelemetry {
    pub fn new(config: Option<OtlpConfig>, slot: OtelSlot) -> Self {
        Self { config, slot }
    }
}

impl Telemetry for OtlpTelemetry {
    fn setup(&self, shutdown: &Shutdown, hooks: &mut TeardownHooks) -> Result<(), TelemetryError> {
        let Some(config) = &self.config else {
            tracing::info!("OTLP trace export disabled");
            return Ok(());
        };

        if shutdown.is_triggered() {
            return Err(TelemetryError::Cancelled);
        }

        let tracer = init_tracer(config)?;
        let provider = tracer.provider();
        let slot = self.slot.clone();
        hooks.register("otlp-tracer", move |deadline| async move {
            if let Err(e) = slot.detach() {
                tracing::debug!(error = %e, "Tracing layer already gone");
            }
            shutdown_provider(provider, deadline).await
        });

        self.slot.attach(tracer)?;

        tracing::info!(
            endpoint = %config.endpoint,
            service_name = %config.service_name,
            sampling_rate = config.sampling_rate,
            "OTLP trace export enabled"
        );
        Ok(())
    }
}

fn init_tracer(config: &OtlpConfig) -> Result<Tracer, TelemetryError> {
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
                    config.sampling_rate,
                ))))
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![KeyValue::new(
                    "service.name",
                    Value::from(config.service_name.clone()),
                )])),
        )
        .with_batch_config(BatchConfig::default())
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(config.endpoint.clone())
                .with_timeout(Duration::from_secs(config.export_timeout_secs)),
        )
        .install_batch(runtime::Tokio)?;

    Ok(tracer)
}

/// Flush pending spans, then drop the global provider.
///
/// Both calls block on the batch processor, so they run off the async workers.
async fn shutdown_provider(
    provider: Option<TracerProvider>,
    deadline: Duration,
) -> Result<(), TelemetryError> {
    tracing::debug!(?deadline, "Flushing trace exporter");

    let flushed = tokio::task::spawn_blocking(move || {
        let failures: Vec<String> = provider
            .map(|p| p.force_flush())
            .unwrap_or_default()
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();

        global::shutdown_tracer_provider();
        failures
    })
    .await
    .map_err(|e| TelemetryError::Export(format!("flush task failed: {}", e)))?;

    if flushed.is_empty() {
        Ok(())
    } else {
        Err(TelemetryError::Export(flushed.join("; ")))
    }
}
