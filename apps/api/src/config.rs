use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::llm_client::openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::llm_client::{GatewaySettings, Provider};
use crate::recommend::selector::{SelectorConfig, DEFAULT_MAX_CANDIDATES, DEFAULT_SAMPLE_SEED};

/// Application configuration loaded from environment variables.
/// Every variable has a default; API keys are optional and gate the flows that need them.
#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: String,
    pub max_candidates: usize,
    pub sample_seed: u64,
    pub recommender_provider: Provider,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub google_maps_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            dataset_path: env_or("DATASET_PATH", "manhattan_restaurants.csv"),
            max_candidates: parse_env("MAX_CANDIDATES", DEFAULT_MAX_CANDIDATES)?,
            sample_seed: parse_env("SAMPLE_SEED", DEFAULT_SAMPLE_SEED)?,
            recommender_provider: std::env::var("RECOMMENDER_PROVIDER")
                .ok()
                .map(|v| v.parse::<Provider>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("RECOMMENDER_PROVIDER must be 'ollama' or 'openai'")?
                .unwrap_or(Provider::Ollama),
            ollama_url: env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            ollama_model: env_or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            google_maps_api_key: optional_env("GOOGLE_MAPS_API_KEY"),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn selector(&self) -> SelectorConfig {
        SelectorConfig {
            max_candidates: self.max_candidates,
            seed: self.sample_seed,
        }
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            ollama_url: self.ollama_url.clone(),
            ollama_model: self.ollama_model.clone(),
            openai_base_url: self.openai_base_url.clone(),
            openai_model: self.openai_model.clone(),
            openai_api_key: self.openai_api_key.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank values are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
