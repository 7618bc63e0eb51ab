//! Minimal traced HTTP service with a graceful lifecycle harness.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{CompositeError, Harness, HarnessOptions, Shutdown};
