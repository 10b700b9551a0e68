//! Chat domain types
//!
//! The conversation render model and the backend exchange contract.

pub mod message;
pub mod reply;
pub mod session_id;

pub use message::{ChatLog, ChatMessage, Sender};
pub use reply::ExchangeReply;
pub use session_id::SessionId;
