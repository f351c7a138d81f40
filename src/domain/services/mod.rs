//! Pure, total transforms between learner input, model text, and the
//! tutoring contract.

mod contract_validator;
mod fallback_synthesizer;
mod prompt_assembler;
mod response_sanitizer;

pub use contract_validator::*;
pub use fallback_synthesizer::*;
pub use prompt_assembler::*;
pub use response_sanitizer::*;
