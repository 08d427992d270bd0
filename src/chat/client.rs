//! HTTP client for the chat completions endpoint

use crate::chat::{parse_messages, ChatCompletionRequest, ChatMessage, WebSearchOptions};
use crate::config::ApiSettings;
use crate::{ChatSpeakError, Result};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

/// Something that can answer a conversation
pub trait ChatBackend {
    /// Send the whole conversation, return the reply messages
    ///
    /// A non-success HTTP status is `ChatSpeakError::Api`.
    fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<String>>;
}

/// Blocking client for a Qianfan-style chat completions API
pub struct ChatClient {
    http: Client,
    url: String,
    model: String,
    temperature: f64,
    web_search: WebSearchOptions,
}

impl ChatClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let api_key = settings.api_key.as_deref().ok_or_else(|| {
            ChatSpeakError::Config(
                "No API key configured. Set api_key in [api] or CHATSPEAK_API_KEY".to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value("api_key", api_key)?);
        if let Some(ref appid) = settings.appid {
            headers.insert("appid", header_value("appid", appid)?);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        info!("Chat client for {} using model {}", settings.url, settings.model);

        Ok(Self {
            http,
            url: settings.url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            web_search: WebSearchOptions::search_only(settings.web_search),
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ChatSpeakError::Config(format!("Invalid {} header value: {}", name, e)))
}

impl ChatBackend for ChatClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<Vec<String>> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            web_search: self.web_search,
        };
        let body = serde_json::to_string(&request)?;
        debug!("POST {} ({} messages)", self.url, messages.len());

        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ChatSpeakError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_messages(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ApiSettings {
        ApiSettings {
            api_key: Some("Bearer test".to_string()),
            appid: Some("app-123".to_string()),
            ..ApiSettings::default()
        }
    }

    #[test]
    fn test_requires_api_key() {
        let settings = ApiSettings {
            api_key: None,
            ..settings()
        };
        assert!(matches!(
            ChatClient::new(&settings),
            Err(ChatSpeakError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_header_with_newline() {
        let settings = ApiSettings {
            api_key: Some("bad\nkey".to_string()),
            ..settings()
        };
        assert!(matches!(
            ChatClient::new(&settings),
            Err(ChatSpeakError::Config(_))
        ));
    }

    #[test]
    fn test_builds_client() {
        let client = ChatClient::new(&settings()).expect("client");
        assert_eq!(client.model, "qwq-32b");
        assert!(client.web_search.enable);
    }
}
