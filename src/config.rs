//! Configuration management

use crate::speech::SpeechSettings;
use crate::{ChatSpeakError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `[api] api_key`
pub const API_KEY_ENV: &str = "CHATSPEAK_API_KEY";
/// Environment variable that overrides `[api] appid`
pub const APPID_ENV: &str = "CHATSPEAK_APPID";

const DEFAULT_URL: &str = "https://qianfan.baidubce.com/v2/chat/completions";
const DEFAULT_MODEL: &str = "qwq-32b";
const DEFAULT_TEMPERATURE: f64 = 0.42;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Everything the chat client needs to reach the API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub url: String,
    pub model: String,
    pub temperature: f64,
    pub web_search: bool,
    pub timeout_secs: u64,
    pub appid: Option<String>,
    pub api_key: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            web_search: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            appid: None,
            api_key: None,
        }
    }
}

/// Application configuration
///
/// Backed by an INI file, `~/.chatspeak.cfg` unless a path is given.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from `path`, writing defaults there if it does not exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| ChatSpeakError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default at {:?}", path);
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| ChatSpeakError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| ChatSpeakError::Config(format!("Failed to save config: {}", e)))
    }

    /// `~/.chatspeak.cfg`, or the working directory if there is no home
    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatspeak.cfg")
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    ///
    /// Secrets are left empty; they come from the file or the environment.
    fn default_config() -> Ini {
        let defaults = ApiSettings::default();
        let speech = SpeechSettings::default();
        let mut ini = Ini::new();

        ini.with_section(Some("api"))
            .set("url", defaults.url)
            .set("model", defaults.model)
            .set("temperature", defaults.temperature.to_string())
            .set("web_search", defaults.web_search.to_string())
            .set("timeout_secs", defaults.timeout_secs.to_string())
            .set("appid", "")
            .set("api_key", "");

        ini.with_section(Some("speech"))
            .set("enabled", "true")
            .set("language", speech.language)
            .set("voice_locale", speech.voice_locale)
            .set("fallback_voice_locale", speech.fallback_voice_locale);

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a non-empty string value, if there is one
    pub fn get_optional(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get_from(Some(section), key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f64) -> f64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get an unsigned integer value from config
    pub fn get_uint(&self, section: &str, key: &str, default: u64) -> u64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// API settings from the file, with environment overrides applied
    pub fn api_settings(&self) -> ApiSettings {
        let mut settings = self.file_api_settings();
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                settings.api_key = Some(key);
            }
        }
        if let Ok(appid) = std::env::var(APPID_ENV) {
            if !appid.trim().is_empty() {
                settings.appid = Some(appid);
            }
        }
        settings
    }

    /// API settings exactly as written in the file
    pub fn file_api_settings(&self) -> ApiSettings {
        ApiSettings {
            url: self.get_string("api", "url", DEFAULT_URL),
            model: self.get_string("api", "model", DEFAULT_MODEL),
            temperature: self.get_float("api", "temperature", DEFAULT_TEMPERATURE),
            web_search: self.get_bool("api", "web_search", true),
            timeout_secs: self.get_uint("api", "timeout_secs", DEFAULT_TIMEOUT_SECS),
            appid: self.get_optional("api", "appid"),
            api_key: self.get_optional("api", "api_key"),
        }
    }

    /// Should replies be read aloud?
    pub fn speech_enabled(&self) -> bool {
        self.get_bool("speech", "enabled", true)
    }

    pub fn speech_settings(&self) -> SpeechSettings {
        let defaults = SpeechSettings::default();
        SpeechSettings {
            language: self.get_string("speech", "language", &defaults.language),
            voice_locale: self.get_string("speech", "voice_locale", &defaults.voice_locale),
            fallback_voice_locale: self.get_string(
                "speech",
                "fallback_voice_locale",
                &defaults.fallback_voice_locale,
            ),
        }
    }
}
