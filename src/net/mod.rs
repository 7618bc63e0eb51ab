//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Harness
//!     → listener.rs (Listener::start on a background task)
//!     → implementation binds, accepts, hands connections to the HTTP layer
//!     → Listener::request_stop → drain → outcome reported back to the harness
//! ```

pub mod listener;

pub use listener::{Listener, ListenerError};
