//! Hosted chat backend speaking the OpenAI chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{chat_messages, http_client, send_json, ChatMessage, LlmError, ModelGateway};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<MessageContent>,
}

/// Message content is either a plain string or a list of typed parts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl MessageContent {
    fn into_text(self) -> String {
        match self {
            MessageContent::Text(text) => text.trim().to_string(),
            MessageContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|p| p.text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string(),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiGateway {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiGateway {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn chat(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: chat_messages(system, prompt),
        };

        debug!("Calling OpenAI model {} ({} prompt chars)", self.model, prompt.len());
        let response: CompletionResponse = send_json(
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&body),
        )
        .await?;

        let choice = response.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        Ok(choice
            .message
            .content
            .map(MessageContent::into_text)
            .unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
