//! Ollama provider implementation
//!
//! Supports local Ollama API for running LLMs locally

use super::{http_client, SYSTEM_PROMPT};
use crate::error::{NicheForgeError, Result};
use crate::llm::LlmProvider;
use crate::types::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OllamaProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            // Local inference is slow on first load
            client: http_client(60)?,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, instruction: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            system: SYSTEM_PROMPT.to_string(),
            prompt: instruction.to_string(),
            options: OllamaOptions {
                temperature: self.temperature,
            },
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                NicheForgeError::network(format!("Failed to connect to Ollama: {}", e), None, Some(url.clone()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = match status.as_u16() {
                404 => format!(
                    "Model '{}' not found. Please pull the model first: ollama pull {}",
                    self.model, self.model
                ),
                500..=599 => format!("Ollama server error ({}). Make sure Ollama is running", status),
                _ => format!("Ollama API request failed ({}): {}", status, error_text),
            };

            return Err(NicheForgeError::llm_provider(self.name(), message, Some(status.as_u16())));
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| NicheForgeError::parse(e.to_string(), None))?;

        Ok(body.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        true // no API key needed
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    system: String,
    prompt: String,
    options: OllamaOptions,
    stream: bool,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}
