//! Library crate for arena-live-back, exposing modules for binaries and integration tests.

/// Runtime configuration.
pub mod config;
/// Wire types.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// HTTP routers.
pub mod routes;
/// Business logic.
pub mod services;
/// Shared application state.
pub mod state;
