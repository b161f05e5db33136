//! Core types and structures for niche-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Inclusive label length bounds over an analyzed domain set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

/// Lexical summary of a competitor domain set for one niche
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPatterns {
    pub average_length: usize,
    pub length_range: LengthRange,
    pub word_count_histogram: BTreeMap<usize, usize>,
    pub most_common_word_count: usize,
    pub common_words: Vec<String>,
    pub industry_terms: Vec<String>,
    pub niche_keywords: Vec<String>,
    pub suffixes: Vec<String>,
    pub prefixes: Vec<String>,
    pub structure_patterns: Vec<String>,
    pub brand_types: Vec<String>,
    pub contains_numbers_count: usize,
}

impl DomainPatterns {
    /// True when the summary was built from an empty domain set
    pub fn is_empty(&self) -> bool {
        self.length_range.max == 0
    }
}

/// Where a candidate's quality score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Delegated,
    Heuristic,
}

impl std::fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreSource::Delegated => write!(f, "delegated"),
            ScoreSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Registrar answer for a single domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityQuote {
    pub domain: String,
    pub available: bool,
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvailabilityQuote {
    /// Quote used whenever the registrar could not give a real answer
    pub fn unavailable(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            available: false,
            price: None,
            error: Some(error.into()),
        }
    }
}

/// A generated domain, enriched by the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDomain {
    pub domain: String,
    pub label: String,
    pub available: bool,
    pub price: Option<f64>,
    pub quality_score: Option<u8>,
    pub score_source: Option<ScoreSource>,
    pub reason: Option<String>,
    pub error: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}

impl CandidateDomain {
    /// A freshly generated candidate with no registrar or score data yet
    pub fn new(domain: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            label: label.into(),
            available: false,
            price: None,
            quality_score: None,
            score_source: None,
            reason: None,
            error: None,
            checked_at: None,
        }
    }

    /// Available and, when a price is known, strictly under the ceiling
    pub fn is_viable(&self, price_ceiling: f64) -> bool {
        self.available && self.price.map_or(true, |p| p < price_ceiling)
    }

    /// Display price in registrar currency units
    pub fn price_display(&self) -> String {
        match self.price {
            Some(p) => format!("${:.2}", p),
            None => "-".to_string(),
        }
    }
}

/// Candidate generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStrategy {
    RuleBased,
    Delegated,
}

impl std::fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStrategy::RuleBased => write!(f, "rule"),
            GenerationStrategy::Delegated => write!(f, "llm"),
        }
    }
}

impl std::str::FromStr for GenerationStrategy {
    type Err = crate::error::NicheForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rule" | "rules" | "rule-based" => Ok(GenerationStrategy::RuleBased),
            "llm" | "ai" | "delegated" => Ok(GenerationStrategy::Delegated),
            other => Err(crate::config_error!("unknown generation strategy: {}", other)),
        }
    }
}

/// Configuration for candidate generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub strategy: GenerationStrategy,
    pub target_count: usize,
    pub suffix: String,
    pub min_label_length: usize,
    pub max_label_length: usize,
    /// Size of competitor lists generated for niches missing from the catalog
    pub competitor_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            strategy: GenerationStrategy::Delegated,
            target_count: 15,
            suffix: "com".to_string(),
            min_label_length: 3,
            max_label_length: 20,
            competitor_count: 20,
        }
    }
}

/// Configuration for availability checks and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankConfig {
    pub concurrent_checks: usize,
    /// Score candidates the registrar reported as unavailable too
    pub score_unavailable: bool,
    /// Ask the text-generation collaborator for scores before the local heuristic
    pub delegated_scoring: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            concurrent_checks: 8,
            score_unavailable: true,
            delegated_scoring: true,
        }
    }
}

/// Bounds for the regenerate-and-rank loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub min_viable: usize,
    pub price_ceiling: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_viable: 5,
            price_ceiling: 100.0,
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_key: String::new(),
            base_url: None,
            temperature: 0.7,
        }
    }
}

/// Registrar credentials
#[derive(Debug, Clone, Default)]
pub struct RegistrarConfig {
    pub username: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
}

impl RegistrarConfig {
    pub fn has_credentials(&self) -> bool {
        matches!((&self.username, &self.token), (Some(u), Some(t)) if !u.is_empty() && !t.is_empty())
    }
}

/// Everything the orchestrator needs besides its collaborators
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub generation: GenerationConfig,
    pub rank: RankConfig,
    pub retry: RetryPolicy,
    /// Replace the static keyword seed with a delegated keyword list
    pub llm_keywords: bool,
    /// Let the text-generation collaborator pick industry terms from the recurring words
    pub llm_industry_terms: bool,
    /// Split labels through the text-generation collaborator
    pub llm_segmentation: bool,
}

/// Pipeline counters shared across collaborator calls
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    llm_calls: AtomicU64,
    fallbacks: AtomicU64,
    registrar_checks: AtomicU64,
    registrar_failures: AtomicU64,
    candidates_generated: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_llm_calls(&self) {
        self.llm_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fallbacks(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_registrar_checks(&self) {
        self.registrar_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_registrar_failures(&self) {
        self.registrar_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_candidates_generated(&self, count: usize) {
        self.candidates_generated
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            llm_calls: self.llm_calls.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            registrar_checks: self.registrar_checks.load(Ordering::Relaxed),
            registrar_failures: self.registrar_failures.load(Ordering::Relaxed),
            candidates_generated: self.candidates_generated.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PipelineMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub llm_calls: u64,
    pub fallbacks: u64,
    pub registrar_checks: u64,
    pub registrar_failures: u64,
    pub candidates_generated: u64,
}
