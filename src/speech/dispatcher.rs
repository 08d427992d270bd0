//! Speech dispatcher
//!
//! Holds the platform's ordered strategy list, chosen once at startup, and
//! speaks each utterance with the first strategy that works.

use crate::platform::Platform;
use crate::speech::backends::{CommandStrategy, NativeVoiceStrategy, SapiStrategy};
use crate::speech::probe::{CommandProber, PathProber};
use crate::speech::process::{ProcessInvoker, SystemInvoker};
use crate::speech::{SpeechStrategy, Utterance};
use log::{debug, info, warn};
use std::sync::Arc;

/// Result of one `speak` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A strategy spoke the text
    Spoken { strategy: String },
    /// Nothing to say: the text was empty or whitespace
    Skipped,
    /// Every strategy failed, or there were none
    Unavailable,
}

/// Speech options that shape the strategy list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSettings {
    /// Language code passed to command-line tools (`-l`/`-v`)
    pub language: String,
    /// Locale tag of the preferred native voice
    pub voice_locale: String,
    /// Locale tag tried when the preferred voice is not installed
    pub fallback_voice_locale: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "zh".to_string(),
            voice_locale: "zh-CN".to_string(),
            fallback_voice_locale: "en-US".to_string(),
        }
    }
}

/// Tries strategies in order until one speaks
pub struct SpeechDispatcher {
    strategies: Vec<Box<dyn SpeechStrategy>>,
}

impl SpeechDispatcher {
    /// Dispatcher over an explicit strategy list
    pub fn new(strategies: Vec<Box<dyn SpeechStrategy>>) -> Self {
        Self { strategies }
    }

    /// Dispatcher that never speaks
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    /// Strategies for the running platform, using the real OS tools
    pub fn for_current_platform(settings: &SpeechSettings) -> Self {
        Self::for_platform(
            Platform::current(),
            settings,
            Arc::new(PathProber::new()),
            Arc::new(SystemInvoker),
        )
    }

    /// Build the strategy list for `platform`
    ///
    /// **Windows:** native voice
    ///
    /// **macOS:** native voice, then `say`
    ///
    /// **Linux and other Unix:**
    /// 1. spd-say (Speech Dispatcher, respects system accessibility settings)
    /// 2. espeak
    ///
    /// **WSL:** as Linux, then Windows SAPI through PowerShell
    pub fn for_platform(
        platform: Platform,
        settings: &SpeechSettings,
        prober: Arc<dyn CommandProber>,
        invoker: Arc<dyn ProcessInvoker>,
    ) -> Self {
        let native = || {
            Box::new(NativeVoiceStrategy::new(
                settings.voice_locale.clone(),
                settings.fallback_voice_locale.clone(),
            )) as Box<dyn SpeechStrategy>
        };
        let spd_say = || {
            Box::new(CommandStrategy::spd_say(
                &settings.language,
                prober.clone(),
                invoker.clone(),
            )) as Box<dyn SpeechStrategy>
        };
        let espeak = || {
            Box::new(CommandStrategy::espeak(
                &settings.language,
                prober.clone(),
                invoker.clone(),
            )) as Box<dyn SpeechStrategy>
        };

        let strategies: Vec<Box<dyn SpeechStrategy>> = match platform {
            Platform::Windows => vec![native()],
            Platform::MacOs => vec![
                native(),
                Box::new(CommandStrategy::say(prober.clone(), invoker.clone())),
            ],
            Platform::Linux | Platform::Unix => vec![spd_say(), espeak()],
            Platform::Wsl => vec![
                spd_say(),
                espeak(),
                Box::new(SapiStrategy::new(
                    settings.voice_locale.clone(),
                    settings.fallback_voice_locale.clone(),
                    prober.clone(),
                    invoker.clone(),
                )),
            ],
            Platform::Unsupported => Vec::new(),
        };

        let dispatcher = Self::new(strategies);
        info!(
            "Speech strategies for {:?}: [{}]",
            platform,
            dispatcher.strategy_names().join(", ")
        );
        dispatcher
    }

    /// Names of the configured strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Speak `text` with the first strategy that succeeds
    ///
    /// Never fails: strategy errors are logged and the next one is tried.
    pub fn speak(&self, text: &str) -> DispatchOutcome {
        let utterance = match Utterance::new(text) {
            Some(utterance) => utterance,
            None => {
                debug!("Nothing to speak");
                return DispatchOutcome::Skipped;
            }
        };

        if self.strategies.is_empty() {
            debug!("No speech strategies configured");
            return DispatchOutcome::Unavailable;
        }

        for strategy in &self.strategies {
            debug!("Trying speech strategy: {}", strategy.name());
            if strategy.speak(&utterance) {
                info!("Spoke reply with {}", strategy.name());
                return DispatchOutcome::Spoken {
                    strategy: strategy.name().to_string(),
                };
            }
        }

        warn!(
            "Could not speak reply; tried: {}",
            self.strategy_names().join(", ")
        );
        DispatchOutcome::Unavailable
    }
}
