//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (harness.rs):
//!     Subscribe to signals → Set up telemetry → Start listener task
//!
//! Serve (harness.rs):
//!     Race: listener outcome (oneshot) vs shutdown.rs trigger
//!
//! Shutdown (harness.rs, teardown.rs):
//!     Stop accepting → Drain within grace period → Teardown hooks → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (once)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: telemetry first, listener last
//! - Ordered shutdown: stop accept, drain, flush exporters
//! - Every wait during shutdown is bounded
//! - Failures are accumulated into one CompositeError, first cause first

pub mod error;
pub mod harness;
pub mod shutdown;
pub mod signals;
pub mod state;
pub mod teardown;

pub use error::{CompositeError, LifecycleError, ShutdownError};
pub use harness::{Harness, HarnessOptions};
pub use shutdown::Shutdown;
pub use signals::SignalSubscription;
pub use state::{LifecyclePhase, LifecycleState};
pub use teardown::TeardownHooks;
