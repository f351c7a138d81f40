mod chat_message;
mod chat_session;
mod transport_error;
mod tutor_response;

pub use chat_message::*;
pub use chat_session::*;
pub use transport_error::*;
pub use tutor_response::*;
