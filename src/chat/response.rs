//! Pulling reply text out of a chat completion response

use log::{debug, error};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Content of every `choices[].message.content`, in order
///
/// Choices without a message or content are skipped. A body that is not
/// valid JSON is logged and yields no messages.
pub fn parse_messages(body: &str) -> Vec<String> {
    match serde_json::from_str::<CompletionResponse>(body) {
        Ok(response) => {
            let messages: Vec<String> = response
                .choices
                .into_iter()
                .filter_map(|choice| choice.message.and_then(|m| m.content))
                .collect();
            debug!("Extracted {} message(s) from response", messages.len());
            messages
        }
        Err(e) => {
            error!("Failed to parse completion response: {}", e);
            Vec::new()
        }
    }
}
