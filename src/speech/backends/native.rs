//! Native OS voice backend using the tts crate
//!
//! The `tts` crate talks to the platform synthesizer directly
//! (SAPI/WinRT on Windows, AVFoundation on macOS). A voice for the preferred
//! locale is chosen, then the fallback locale; with neither installed the
//! strategy fails instead of speaking with whatever voice is the default.

use crate::error::SpeechError;
use crate::speech::{SpeechStrategy, Utterance};
use log::{debug, warn};
use std::thread;
use std::time::Duration;
use tts::Tts as TtsCrate;

/// How often to ask the synthesizer whether it is still talking
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Platform synthesizer with locale-based voice selection
#[derive(Debug, Clone)]
pub struct NativeVoiceStrategy {
    preferred_locale: String,
    fallback_locale: String,
}

impl NativeVoiceStrategy {
    pub fn new(preferred_locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        Self {
            preferred_locale: preferred_locale.into(),
            fallback_locale: fallback_locale.into(),
        }
    }

    /// Wait for the current utterance to finish, if the platform can tell us
    fn wait_until_done(tts: &TtsCrate) -> Result<(), SpeechError> {
        if !tts.supported_features().is_speaking {
            debug!("Synthesizer cannot report progress, not waiting");
            return Ok(());
        }

        // Give the synthesizer a moment to start before polling
        thread::sleep(POLL_INTERVAL);
        while tts
            .is_speaking()
            .map_err(|e| SpeechError::Native(format!("Failed to query speech state: {}", e)))?
        {
            thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    }
}

impl Default for NativeVoiceStrategy {
    fn default() -> Self {
        Self::new("zh-CN", "en-US")
    }
}

/// Pick the voice matching `preferred`, else `fallback`, by language tag
///
/// Tags compare case-insensitively and `_` is treated as `-`, so `zh_CN`
/// matches `zh-CN`. Returns the index into `languages`.
pub fn select_voice(languages: &[String], preferred: &str, fallback: &str) -> Option<usize> {
    let find = |wanted: &str| {
        let wanted = normalize_tag(wanted);
        languages.iter().position(|lang| normalize_tag(lang) == wanted)
    };

    if let Some(idx) = find(preferred) {
        return Some(idx);
    }
    let idx = find(fallback)?;
    warn!("No '{}' voice installed, using '{}' instead", preferred, fallback);
    Some(idx)
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

impl SpeechStrategy for NativeVoiceStrategy {
    fn name(&self) -> &str {
        "native voice"
    }

    fn attempt(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let mut tts = TtsCrate::default()
            .map_err(|e| SpeechError::Native(format!("Failed to initialize TTS: {}", e)))?;

        if !tts.supported_features().voice {
            return Err(SpeechError::Native(
                "voice selection not supported on this platform".to_string(),
            ));
        }

        let voices = tts
            .voices()
            .map_err(|e| SpeechError::Native(format!("Failed to get voices: {}", e)))?;
        let languages: Vec<String> = voices
            .iter()
            .map(|voice| voice.language().as_str().to_string())
            .collect();
        debug!("Installed voice languages: {:?}", languages);

        let idx = select_voice(&languages, &self.preferred_locale, &self.fallback_locale)
            .ok_or_else(|| {
                SpeechError::VoiceUnavailable(format!(
                    "'{}' or '{}'",
                    self.preferred_locale, self.fallback_locale
                ))
            })?;

        let voice = &voices[idx];
        debug!("Selecting voice: {}", voice.name());
        tts.set_voice(voice)
            .map_err(|e| SpeechError::Native(format!("Failed to set voice: {}", e)))?;

        tts.speak(utterance.as_str(), false)
            .map_err(|e| SpeechError::Native(format!("Speak failed: {}", e)))?;

        Self::wait_until_done(&tts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_preferred_locale_wins() {
        let available = langs(&["en-US", "de-DE", "zh-CN"]);
        assert_eq!(select_voice(&available, "zh-CN", "en-US"), Some(2));
    }

    #[test]
    fn test_fallback_locale() {
        let available = langs(&["de-DE", "en-US"]);
        assert_eq!(select_voice(&available, "zh-CN", "en-US"), Some(1));
    }

    #[test]
    fn test_no_arbitrary_voice() {
        let available = langs(&["de-DE", "fr-FR"]);
        assert_eq!(select_voice(&available, "zh-CN", "en-US"), None);
        assert_eq!(select_voice(&[], "zh-CN", "en-US"), None);
    }

    #[test]
    fn test_tag_normalization() {
        let available = langs(&["zh_cn"]);
        assert_eq!(select_voice(&available, "zh-CN", "en-US"), Some(0));
    }
}
