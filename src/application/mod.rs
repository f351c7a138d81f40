//! # Application Layer
//!
//! Ports to the outside world and the use cases that orchestrate the domain
//! through them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
