//! Environment-driven configuration

use crate::config_error;
use crate::domain::{create_registrar, Registrar};
use crate::error::Result;
use crate::llm::{LlmProvider, ProviderRouter};
use crate::pipeline::NicheAnalyzer;
use crate::types::{GenerationStrategy, LlmConfig, PipelineConfig, RegistrarConfig};
use std::sync::Arc;

/// Everything needed to build a [`crate::NicheAnalyzer`] from the environment
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    /// Configured providers, most preferred first
    pub llm: Vec<LlmConfig>,
    pub registrar: RegistrarConfig,
    pub pipeline: PipelineConfig,
}

impl AnalyzerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut llm = Vec::new();
        if let Some(api_key) = get("OPENAI_API_KEY") {
            llm.push(LlmConfig {
                provider: "openai".to_string(),
                model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string()),
                api_key,
                base_url: get("OPENAI_BASE_URL"),
                ..Default::default()
            });
        }
        if let Some(api_key) = get("ANTHROPIC_API_KEY") {
            llm.push(LlmConfig {
                provider: "anthropic".to_string(),
                model: get("ANTHROPIC_MODEL").unwrap_or_else(|| "claude-4-sonnet".to_string()),
                api_key,
                base_url: None,
                ..Default::default()
            });
        }
        if let Some(api_key) = get("GEMINI_API_KEY") {
            llm.push(LlmConfig {
                provider: "gemini".to_string(),
                model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string()),
                api_key,
                base_url: None,
                ..Default::default()
            });
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            llm.push(LlmConfig {
                provider: "ollama".to_string(),
                model,
                api_key: String::new(),
                base_url: get("OLLAMA_BASE_URL"),
                ..Default::default()
            });
        }

        let registrar = RegistrarConfig {
            username: get("NAMECOM_USERNAME"),
            token: get("NAMECOM_TOKEN"),
            base_url: get("NAMECOM_BASE_URL"),
        };

        let mut pipeline = PipelineConfig::default();
        if let Some(strategy) = get("NICHE_FORGE_STRATEGY") {
            pipeline.generation.strategy = strategy.parse::<GenerationStrategy>()?;
        } else if llm.is_empty() {
            pipeline.generation.strategy = GenerationStrategy::RuleBased;
        }
        if let Some(value) = get("NICHE_FORGE_MAX_ATTEMPTS") {
            pipeline.retry.max_attempts = value.parse()?;
            if pipeline.retry.max_attempts == 0 {
                return Err(config_error!("NICHE_FORGE_MAX_ATTEMPTS must be at least 1"));
            }
        }
        if let Some(value) = get("NICHE_FORGE_MIN_VIABLE") {
            pipeline.retry.min_viable = value.parse()?;
        }
        if let Some(value) = get("NICHE_FORGE_PRICE_CEILING") {
            pipeline.retry.price_ceiling = value.parse()?;
        }
        if let Some(value) = get("NICHE_FORGE_LLM_KEYWORDS") {
            pipeline.llm_keywords = parse_bool("NICHE_FORGE_LLM_KEYWORDS", &value)?;
        }
        if let Some(value) = get("NICHE_FORGE_LLM_INDUSTRY_TERMS") {
            pipeline.llm_industry_terms = parse_bool("NICHE_FORGE_LLM_INDUSTRY_TERMS", &value)?;
        }
        if let Some(value) = get("NICHE_FORGE_LLM_SEGMENTATION") {
            pipeline.llm_segmentation = parse_bool("NICHE_FORGE_LLM_SEGMENTATION", &value)?;
        }
        pipeline.rank.delegated_scoring = !llm.is_empty();

        Ok(Self {
            llm,
            registrar,
            pipeline,
        })
    }

    pub fn has_llm(&self) -> bool {
        !self.llm.is_empty()
    }

    /// Router over every configured provider, or `None` when there are none.
    /// The first configured provider is the default.
    pub fn build_router(&self) -> Result<Option<ProviderRouter>> {
        if self.llm.is_empty() {
            return Ok(None);
        }
        let router = ProviderRouter::new();
        for config in &self.llm {
            router.add_provider(config)?;
        }
        tracing::debug!(
            providers = ?router.available_providers(),
            default = %router.default_provider(),
            "LLM providers configured"
        );
        Ok(Some(router))
    }

    pub fn build_registrar(&self) -> Result<Arc<dyn Registrar>> {
        create_registrar(&self.registrar)
    }

    /// Analyzer wired to the configured collaborators
    pub fn build_analyzer(&self) -> Result<NicheAnalyzer> {
        let provider = self
            .build_router()?
            .map(|router| Arc::new(router) as Arc<dyn LlmProvider>);
        Ok(NicheAnalyzer::new(self.pipeline.clone(), provider, self.build_registrar()?))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(config_error!("{} must be a boolean, got '{}'", key, other)),
    }
}
