//! Logging integration.
//!
//! blobkit reports through `tracing`; this module only wires up a subscriber
//! for applications that do not bring their own.

pub mod logging;

pub use logging::{init_logging, LoggingConfig, LoggingGuard};
