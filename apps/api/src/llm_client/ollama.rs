//! Local chat backend served by Ollama (`POST /api/chat`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{chat_messages, http_client, send_json, ChatMessage, LlmError, ModelGateway};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:12b";

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Clone)]
pub struct OllamaGateway {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaGateway {
    /// `base_url` is the server root, e.g. `http://localhost:11434`.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl ModelGateway for OllamaGateway {
    async fn chat(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages: chat_messages(system, prompt),
            stream: false,
        };

        debug!("Calling Ollama model {} ({} prompt chars)", self.model, prompt.len());
        let response: OllamaChatResponse =
            send_json(self.client.post(&self.endpoint).json(&body)).await?;

        Ok(response.message.content)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
