//! Chat completion API glue

pub mod client;
pub mod message;
pub mod request;
pub mod response;

pub use client::{ChatBackend, ChatClient};
pub use message::{ChatMessage, Role, Transcript};
pub use request::{ChatCompletionRequest, WebSearchOptions};
pub use response::parse_messages;
