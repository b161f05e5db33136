//! Text-generation collaborator integration
//!
//! Providers turn an instruction into free-form text. Everything above them
//! (prompt building, JSON extraction, fallback) is provider independent.

pub mod client;
pub mod parse;
pub mod prompts;
pub mod providers;
pub mod router;

pub use client::TextCollaborator;
pub use router::ProviderRouter;

use crate::error::{NicheForgeError, Result};
use crate::types::LlmConfig;
use async_trait::async_trait;

/// Core trait for all text-generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one instruction and return the raw response text
    async fn complete(&self, instruction: &str) -> Result<String>;

    /// Get provider name
    fn name(&self) -> &'static str;

    /// Get model name being used
    fn model(&self) -> &str;

    /// Check if provider is configured and ready
    fn is_ready(&self) -> bool;
}

/// Get available LLM providers
pub fn available_providers() -> Vec<&'static str> {
    vec!["openai", "anthropic", "gemini", "ollama"]
}

/// Create an LLM provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>> {
    match config.provider.as_str() {
        "openai" => Ok(Box::new(providers::OpenAiProvider::new(config)?)),
        "anthropic" => Ok(Box::new(providers::AnthropicProvider::new(config)?)),
        "gemini" => Ok(Box::new(providers::GeminiProvider::new(config)?)),
        "ollama" => Ok(Box::new(providers::OllamaProvider::new(config)?)),
        _ => Err(NicheForgeError::config(format!(
            "Unsupported LLM provider: {}. Supported providers: {}",
            config.provider,
            available_providers().join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_rejects_unknown() {
        let config = LlmConfig {
            provider: "mystery".to_string(),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unsupported LLM provider"));
    }

    #[test]
    fn test_keyed_providers_need_api_key() {
        for provider in ["openai", "anthropic", "gemini"] {
            let config = LlmConfig {
                provider: provider.to_string(),
                ..Default::default()
            };
            assert!(create_provider(&config).is_err(), "{provider} accepted an empty key");
        }
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: "ollama".to_string(),
            model: "llama3".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        assert!(provider.is_ready());
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3");
    }
}
