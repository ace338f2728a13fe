/// LLM Client: the model gateway used by both recommendation flows.
///
/// ARCHITECTURAL RULE: no other module talks to a language-model HTTP API directly.
/// Callers depend on the `ModelGateway` trait; backends are chosen at startup.
///
/// Gateways make exactly one request per call with a bounded timeout and no
/// automatic retry. Failures surface immediately as `LlmError`.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod ollama;
pub mod openai;

pub use ollama::OllamaGateway;
pub use openai::OpenAiGateway;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM response contained no choices")]
    NoChoices,

    #[error("LLM provider is not configured: {0}")]
    NotConfigured(String),
}

/// A single-turn, non-streaming chat completion backend.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends a system + user message pair and returns the reply text.
    /// An empty string is a valid reply; callers decide what it means.
    async fn chat(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Which backend serves a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    Ollama,
    #[value(name = "openai")]
    OpenAi,
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAi),
            other => Err(format!("unknown LLM provider '{other}' (expected ollama or openai)")),
        }
    }
}

/// Connection settings for every backend. Built from `Config`.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub timeout: Duration,
}

/// Builds the gateway for `provider`.
pub fn build_gateway(
    provider: Provider,
    settings: &GatewaySettings,
) -> Result<Arc<dyn ModelGateway>, LlmError> {
    let gateway: Arc<dyn ModelGateway> = match provider {
        Provider::Ollama => Arc::new(OllamaGateway::new(
            &settings.ollama_url,
            &settings.ollama_model,
            settings.timeout,
        )?),
        Provider::OpenAi => {
            let api_key = settings
                .openai_api_key
                .clone()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;
            Arc::new(OpenAiGateway::new(
                &settings.openai_base_url,
                &settings.openai_model,
                api_key,
                settings.timeout,
            )?)
        }
    };
    Ok(gateway)
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

pub(crate) fn chat_messages<'a>(system: &'a str, prompt: &'a str) -> Vec<ChatMessage<'a>> {
    vec![
        ChatMessage {
            role: "system",
            content: system,
        },
        ChatMessage {
            role: "user",
            content: prompt,
        },
    ]
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Sends a prepared request and decodes a successful JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, LlmError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    debug!("LLM call succeeded: {} response bytes", body.len());
    Ok(serde_json::from_str(&body)?)
}

/// Pulls the human-readable message out of `{"error": "..."}` or
/// `{"error": {"message": "..."}}`, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| {
            e.as_str()
                .or_else(|| e.get("message").and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
