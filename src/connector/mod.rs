//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - Model gateways (Gemini, Anthropic, offline mock)
//! - The HTTP client used by the terminal chat
//! - The API surface: HTTP server, CLI router, and controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
