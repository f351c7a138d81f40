mod model_gateway;
mod tutor_api;

pub use model_gateway::*;
pub use tutor_api::*;
