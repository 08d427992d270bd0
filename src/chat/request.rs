//! Request body for the chat completions endpoint

use crate::chat::ChatMessage;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f64,
    pub web_search: WebSearchOptions,
}

/// Search augmentation switches understood by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WebSearchOptions {
    pub enable: bool,
    pub enable_citation: bool,
    pub enable_trace: bool,
}

impl WebSearchOptions {
    /// Search on, without citations or trace output
    pub fn search_only(enable: bool) -> Self {
        Self {
            enable,
            ..Self::default()
        }
    }
}
