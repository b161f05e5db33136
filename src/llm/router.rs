//! Provider router with cross-provider fallback

use crate::error::{NicheForgeError, Result};
use crate::llm::{create_provider, LlmProvider};
use crate::types::LlmConfig;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Routes instructions to a default provider and falls back to the others.
///
/// Cloning is cheap; clones share the provider table.
#[derive(Clone)]
pub struct ProviderRouter {
    providers: Arc<RwLock<HashMap<String, Arc<dyn LlmProvider>>>>,
    default_provider: Arc<RwLock<String>>,
}

impl ProviderRouter {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            default_provider: Arc::new(RwLock::new("openai".to_string())),
        }
    }

    /// Build and register a provider from configuration
    pub fn add_provider(&self, config: &LlmConfig) -> Result<()> {
        let provider = create_provider(config)?;
        self.insert_provider(Arc::from(provider));
        Ok(())
    }

    /// Register an already constructed provider under its own name
    pub fn insert_provider(&self, provider: Arc<dyn LlmProvider>) {
        let mut providers = self.providers.write();
        if providers.is_empty() {
            *self.default_provider.write() = provider.name().to_string();
        }
        providers.insert(provider.name().to_string(), provider);
    }

    /// Switch the default; unknown names are ignored
    pub fn set_default_provider(&self, provider: &str) {
        let providers = self.providers.read();
        if providers.contains_key(provider) {
            *self.default_provider.write() = provider.to_string();
        }
    }

    pub fn default_provider(&self) -> String {
        self.default_provider.read().clone()
    }

    /// Send the instruction to one named provider
    pub async fn complete_with_provider(&self, instruction: &str, provider_name: &str) -> Result<String> {
        let start_time = Instant::now();

        // clone the Arc so no lock is held across the await
        let provider = {
            let providers = self.providers.read();
            providers
                .get(provider_name)
                .cloned()
                .ok_or_else(|| NicheForgeError::config(format!("Provider not configured: {}", provider_name)))?
        };

        let result = provider.complete(instruction).await;

        match &result {
            Ok(text) => tracing::debug!(
                provider = %provider_name,
                response_len = text.len(),
                duration_ms = %start_time.elapsed().as_millis(),
                "Completion finished"
            ),
            Err(e) => tracing::warn!(
                provider = %provider_name,
                error = %e,
                duration_ms = %start_time.elapsed().as_millis(),
                "Completion failed"
            ),
        }

        result
    }

    /// Registered provider names, sorted
    pub fn available_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_provider(&self, provider: &str) -> bool {
        self.providers.read().contains_key(provider)
    }
}

impl Default for ProviderRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for ProviderRouter {
    /// Default provider first, then every other provider in name order
    async fn complete(&self, instruction: &str) -> Result<String> {
        let default_provider = self.default_provider();
        let mut order = vec![default_provider.clone()];
        order.extend(
            self.available_providers()
                .into_iter()
                .filter(|name| *name != default_provider),
        );

        let mut last_error = None;
        for (position, name) in order.iter().enumerate() {
            if !self.has_provider(name) {
                continue;
            }
            match self.complete_with_provider(instruction, name).await {
                Ok(text) => {
                    if position > 0 {
                        tracing::info!(provider = %name, fallback_used = true, "Fallback provider answered");
                    }
                    return Ok(text);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| NicheForgeError::config("No providers configured")))
    }

    fn name(&self) -> &'static str {
        "router"
    }

    fn model(&self) -> &str {
        "auto"
    }

    fn is_ready(&self) -> bool {
        self.providers.read().values().any(|p| p.is_ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        name: &'static str,
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, answer: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for Scripted {
        async fn complete(&self, _instruction: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .map(str::to_string)
                .ok_or_else(|| NicheForgeError::llm_provider(self.name, "boom", Some(500)))
        }

        fn name(&self) -> &'static str {
            self.name
        }

        fn model(&self) -> &str {
            "test"
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_default_provider_answers() {
        let router = ProviderRouter::new();
        router.insert_provider(Scripted::new("anthropic", Some("a")));
        router.insert_provider(Scripted::new("openai", Some("o")));
        assert_eq!(router.default_provider(), "anthropic");

        router.set_default_provider("openai");
        assert_eq!(router.complete("hi").await.unwrap(), "o");

        router.set_default_provider("missing");
        assert_eq!(router.default_provider(), "openai");
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let failing = Scripted::new("openai", None);
        let backup = Scripted::new("ollama", Some("[\"x\"]"));
        let router = ProviderRouter::new();
        router.insert_provider(failing.clone());
        router.insert_provider(backup.clone());

        assert_eq!(router.complete("hi").await.unwrap(), "[\"x\"]");
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(backup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_failing_returns_last_error() {
        let router = ProviderRouter::new();
        router.insert_provider(Scripted::new("openai", None));
        let err = router.complete("hi").await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));

        let empty = ProviderRouter::new();
        assert!(!empty.is_ready());
        assert!(matches!(empty.complete("hi").await, Err(NicheForgeError::Config { .. })));
    }
}
