//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (accepted by axum::serve)
//!     → server.rs (request ID, timeout, metrics, tracing layers)
//!     → handlers.rs (hello, health)
//!     → Send to client
//!
//! routes.rs describes what server.rs registers and exports it as JSON.
//! ```

pub mod handlers;
pub mod routes;
pub mod server;

pub use routes::{export_routes, route_table, RouteExportError, RouteInfo};
pub use server::HttpServer;
