//! Niche Forge - competitor domain pattern mining and domain recommendations
//!
//! Given a retail niche, Niche Forge collects competitor domains, learns their
//! naming patterns, generates new candidates and ranks them by availability
//! and quality. Every external collaborator (LLM providers, registrars) is
//! optional: failures fall back to local rules and heuristics.

pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod generate;
pub mod lexicon;
pub mod llm;
pub mod pipeline;
pub mod rank;
pub mod types;

// Re-export commonly used types
pub use config::AnalyzerConfig;
pub use error::{NicheForgeError, Result};
pub use fallback::{FallbackReason, Resolution};
pub use types::{
    AvailabilityQuote, CandidateDomain, DomainPatterns, GenerationConfig, GenerationStrategy,
    LengthRange, LlmConfig, MetricsSnapshot, PipelineConfig, PipelineMetrics, RankConfig,
    RegistrarConfig, RetryPolicy, ScoreSource,
};

// Re-export main functionality
pub use analysis::{advise, PatternAggregator, Tokenizer};
pub use domain::{create_registrar, DomainLabel, Registrar};
pub use generate::CandidateGenerator;
pub use lexicon::{Lexicon, NicheCatalog, NicheMatch};
pub use llm::{LlmProvider, ProviderRouter, TextCollaborator};
pub use pipeline::{AnalysisReport, CompetitorSource, NicheAnalyzer, NicheProfile, Outcome, PipelineStage};
pub use rank::{heuristic_score, QualityScorer, Ranker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
