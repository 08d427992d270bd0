//! Speech strategies

// Command-line tools: spd-say, espeak, say
pub mod command;

// Platform synthesizer through the tts crate (Windows, macOS)
pub mod native;

// Windows SAPI through PowerShell, for WSL
pub mod sapi;

pub use command::{CommandStrategy, TextInput};
pub use native::NativeVoiceStrategy;
pub use sapi::SapiStrategy;
