//! Error types for chatspeak

use std::io;
use thiserror::Error;

/// Failures inside the speech subsystem
///
/// None of these escape `SpeechDispatcher::speak`; each one is turned into
/// a failed strategy attempt plus a log line.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("command lookup for '{command}' failed: {reason}")]
    Probe { command: String, reason: String },

    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("scratch file error: {0}")]
    Scratch(#[source] io::Error),

    #[error("failed to remove scratch file {path}: {source}")]
    Cleanup {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no installed voice for {0}")]
    VoiceUnavailable(String),

    #[error("native speech error: {0}")]
    Native(String),

    #[error("'{0}' is not available")]
    CommandUnavailable(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// Main error type for chatspeak
#[derive(Error, Debug)]
pub enum ChatSpeakError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for chatspeak operations
pub type Result<T> = std::result::Result<T, ChatSpeakError>;

impl From<String> for ChatSpeakError {
    fn from(s: String) -> Self {
        ChatSpeakError::Other(s)
    }
}

impl From<&str> for ChatSpeakError {
    fn from(s: &str) -> Self {
        ChatSpeakError::Other(s.to_string())
    }
}
