//! Typed access to the text-generation collaborator

use super::parse::{parse_score, parse_string_array};
use super::LlmProvider;
use crate::fallback::{FallbackReason, Resolution};
use crate::types::PipelineMetrics;
use std::sync::Arc;
use std::time::Instant;

/// Wraps an optional provider and turns every answer into a [`Resolution`].
///
/// A collaborator without a provider answers every request with
/// [`FallbackReason::Unavailable`], so callers never branch on configuration.
#[derive(Clone)]
pub struct TextCollaborator {
    provider: Option<Arc<dyn LlmProvider>>,
    metrics: Arc<PipelineMetrics>,
}

impl TextCollaborator {
    pub fn new(provider: Arc<dyn LlmProvider>, metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            provider: Some(provider),
            metrics,
        }
    }

    pub fn disabled(metrics: Arc<PipelineMetrics>) -> Self {
        Self {
            provider: None,
            metrics,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_ready())
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    /// Raw response text
    pub async fn ask(&self, instruction: &str) -> Resolution<String> {
        let Some(provider) = self.provider.as_ref().filter(|p| p.is_ready()) else {
            return Resolution::fallback(FallbackReason::Unavailable);
        };

        self.metrics.increment_llm_calls();
        let start = Instant::now();
        let result = provider.complete(instruction).await;
        tracing::debug!(
            provider = provider.name(),
            ok = result.is_ok(),
            duration_ms = %start.elapsed().as_millis(),
            "Collaborator call"
        );
        Resolution::from(result)
    }

    /// JSON string array answer
    pub async fn ask_list(&self, instruction: &str) -> Resolution<Vec<String>> {
        self.ask(instruction).await.and_then(|text| parse_string_array(&text))
    }

    /// 1..=100 score answer
    pub async fn ask_score(&self, instruction: &str) -> Resolution<u8> {
        self.ask(instruction).await.and_then(|text| parse_score(&text))
    }
}
