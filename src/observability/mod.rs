//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (request spans exported over OTLP)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//!     → OpenTelemetry collector (optional)
//! ```
//!
//! # Design Decisions
//! - Logging is installed by the binary before anything else runs
//! - Trace export is an auxiliary subsystem owned by the lifecycle harness
//!   (telemetry.rs), so its exporter is flushed after the listener drains

pub mod logging;
pub mod metrics;
pub mod telemetry;
pub mod tracing;

pub use logging::OtelSlot;
pub use telemetry::{Telemetry, TelemetryError};
pub use self::tracing::OtlpTelemetry;
