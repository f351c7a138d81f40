mod conversation;
mod tutor_chat;

pub use conversation::*;
pub use tutor_chat::*;
