//! chatspeak - terminal chat client with spoken replies
//!
//! Sends each line typed by the user to a chat completions API, prints the
//! reply and reads it aloud through whatever speech tools the platform has.

pub mod chat;
pub mod config;
pub mod conversation;
pub mod error;
pub mod platform;
pub mod speech;

pub use error::{ChatSpeakError, Result, SpeechError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "chatspeak";
