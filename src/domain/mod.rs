//! # Domain Layer
//!
//! Tutoring contract, chat session state, and the pure transforms that turn
//! untrusted model text into a contract-conforming reply.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
