// handlers/public/ai/mod.rs - AI shopping assistant

pub mod chat; // POST /api/ai/chat

pub use chat::chat_post;
