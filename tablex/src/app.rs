//! Module containing concrete implementations from the [core](crate::core) module.

/// Table extractor implementations.
pub mod extractor;

/// HTTP server implementation.
pub mod server;

/// Application state configuration.
pub mod state;

/// Upload storage implementations.
pub mod store;
