pub mod chat;
pub mod registration;
pub mod slug;
pub mod stats;

pub use chat::{ChatError, CompletionClient};
pub use registration::RegistrationError;
