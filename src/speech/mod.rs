//! Speech output
//!
//! Best-effort text-to-speech: the dispatcher tries an ordered list of
//! strategies and never reports failure to its caller as an error.

pub mod backends;
pub mod dispatcher;
pub mod probe;
pub mod process;
pub mod scratch;
pub mod strategy;
pub mod utterance;

pub use dispatcher::{DispatchOutcome, SpeechDispatcher, SpeechSettings};
pub use strategy::SpeechStrategy;
pub use utterance::Utterance;
