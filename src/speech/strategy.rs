//! Speech strategy abstraction
//!
//! A strategy is one way of getting text out of the speakers: a native
//! synthesizer or one specific command-line tool. The dispatcher holds an
//! ordered list of them and stops at the first one that works.

use crate::error::SpeechError;
use crate::speech::Utterance;
use log::{debug, warn};

/// One mechanism for speaking text
///
/// Strategies keep no state between calls.
pub trait SpeechStrategy: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Speak the utterance, blocking until the mechanism has finished
    fn attempt(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Speak the utterance, reducing any failure to `false` and a log line
    fn speak(&self, utterance: &Utterance) -> bool {
        match self.attempt(utterance) {
            Ok(()) => {
                debug!("{}: spoke {} chars", self.name(), utterance.as_str().chars().count());
                true
            }
            Err(SpeechError::CommandUnavailable(command)) => {
                debug!("{}: '{}' not installed, skipping", self.name(), command);
                false
            }
            Err(e) => {
                warn!("{}: {}", self.name(), e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl SpeechStrategy for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn attempt(&self, _utterance: &Utterance) -> Result<(), SpeechError> {
            match self.0 {
                None => Ok(()),
                Some(msg) => Err(SpeechError::Native(msg.to_string())),
            }
        }
    }

    #[test]
    fn test_speak_maps_result_to_bool() {
        let utterance = Utterance::new("hi").unwrap();
        assert!(Fixed(None).speak(&utterance));
        assert!(!Fixed(Some("no audio device")).speak(&utterance));
    }
}
