//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Pick pretty or JSON output from config
//! - Leave a slot for the OpenTelemetry layer, filled once telemetry setup succeeds
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - The OpenTelemetry layer sits directly on the registry so it sees every span

use opentelemetry_sdk::trace::Tracer;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{LogFormat, ObservabilityConfig};

type OtelLayer = Option<OpenTelemetryLayer<Registry, Tracer>>;

/// Handle to the subscriber's OpenTelemetry layer.
#[derive(Clone)]
pub struct OtelSlot {
    handle: reload::Handle<OtelLayer, Registry>,
}

impl OtelSlot {
    /// An empty slot and the layer it controls.
    pub fn new() -> (reload::Layer<OtelLayer, Registry>, Self) {
        let (layer, handle) = reload::Layer::new(None);
        (layer, Self { handle })
    }

    /// Start exporting spans through `tracer`.
    pub fn attach(&self, tracer: Tracer) -> Result<(), reload::Error> {
        self.handle
            .modify(|layer| *layer = Some(tracing_opentelemetry::layer().with_tracer(tracer)))
    }

    /// Stop exporting spans.
    pub fn detach(&self) -> Result<(), reload::Error> {
        self.handle.modify(|layer| *layer = None)
    }
}

impl std::fmt::Debug for OtelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtelSlot").finish_non_exhaustive()
    }
}

/// Filter applied when `RUST_LOG` is unset.
pub fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("apm_api={0},tower_http={0}", level))
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<OtelSlot, TryInitError> {
    let (otel_layer, slot) = OtelSlot::new();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(&config.log_level));

    let registry = tracing_subscriber::registry().with(otel_layer).with(filter);

    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?,
    }

    Ok(slot)
}
