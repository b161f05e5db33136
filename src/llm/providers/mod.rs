//! LLM provider implementations
//!
//! Each provider is implemented in its own module for better organization and maintainability.

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::error::{NicheForgeError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// System message sent by providers that support one
pub const SYSTEM_PROMPT: &str = "You are an expert domain name analyst specializing in e-commerce and branding. \
Follow the requested output format exactly and return raw JSON without code fences when asked for JSON.";

pub(crate) fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| NicheForgeError::network(e.to_string(), None, None))
}

/// Turn a non-success response into a provider error with a helpful message
pub(crate) async fn status_error(provider: &'static str, response: Response) -> NicheForgeError {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let message = match status.as_u16() {
        401 => "Authentication failed (401). Please check your API key".to_string(),
        403 => "Access forbidden (403). Your API key may not have permission for this endpoint".to_string(),
        429 => "Rate limit exceeded (429). Please try again later".to_string(),
        500..=599 => format!("Server error ({}). The API service is experiencing issues", status),
        _ => format!("API request failed ({}): {}", status, error_text),
    };

    NicheForgeError::llm_provider(provider, message, Some(status.as_u16()))
}
