//! Niche analysis orchestration
//!
//! `Idle → Tokenizing → Aggregating → Generating → Ranking → Done`, with a
//! bounded back-edge from `Ranking` to `Generating` while too few viable
//! candidates have been found. Nothing in here returns an error: collaborator
//! failures are resolved by local fallbacks and every run ends in an
//! [`AnalysisReport`].

use crate::analysis::patterns::MAX_INDUSTRY_TERMS;
use crate::analysis::{advise, fallback_industry_terms, PatternAggregator, TokenizedDomain};
use crate::domain::{DomainLabel, Registrar};
use crate::fallback::{FallbackReason, Resolution};
use crate::generate::{normalize_excluded, CandidateGenerator};
use crate::lexicon::{KeywordSeed, Lexicon, NicheCatalog};
use crate::llm::{prompts, LlmProvider, TextCollaborator};
use crate::rank::{assign_reasons, sort_ranked, QualityScorer, Ranker};
use crate::types::{CandidateDomain, DomainPatterns, MetricsSnapshot, PipelineConfig, PipelineMetrics};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Idle,
    Tokenizing,
    Aggregating,
    Generating,
    Ranking,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Tokenizing => "tokenizing",
            PipelineStage::Aggregating => "aggregating",
            PipelineStage::Generating => "generating",
            PipelineStage::Ranking => "ranking",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Current stage of one run, with transitions logged at debug
struct StageTracker<'a> {
    niche: &'a str,
    stage: PipelineStage,
}

impl<'a> StageTracker<'a> {
    fn new(niche: &'a str) -> Self {
        Self {
            niche,
            stage: PipelineStage::Idle,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        tracing::debug!(niche = %self.niche, from = %self.stage, to = %next, "Pipeline stage");
        self.stage = next;
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Enough viable candidates were found
    Done,
    /// The attempt bound was reached first; recommendations are best effort
    Exhausted { attempts: usize },
    /// Nothing could be produced; recommendations are empty
    Failed { reason: String },
}

/// Where the competitor domains of a run came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompetitorSource {
    Catalog { key: String },
    Generated,
    Provided,
}

#[derive(Debug, Clone, Serialize)]
pub struct NicheProfile {
    pub niche: String,
    pub source: CompetitorSource,
    pub competitors: Vec<String>,
}

/// Everything a caller gets back from an analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub niche: String,
    pub profile: NicheProfile,
    pub patterns: DomainPatterns,
    pub advice: Vec<String>,
    /// Ranked best first; empty when the outcome is `Failed`
    pub recommendations: Vec<CandidateDomain>,
    pub outcome: Outcome,
    /// Completed generate-and-rank passes
    pub attempts: usize,
    pub metrics: MetricsSnapshot,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    /// Recommendations that pass the viability check, in rank order
    pub fn viable(&self, price_ceiling: f64) -> Vec<&CandidateDomain> {
        self.recommendations
            .iter()
            .filter(|c| c.is_viable(price_ceiling))
            .collect()
    }
}

/// Runs the full analysis for a niche
#[derive(Clone)]
pub struct NicheAnalyzer {
    aggregator: PatternAggregator,
    generator: CandidateGenerator,
    ranker: Ranker,
    collaborator: TextCollaborator,
    catalog: Arc<NicheCatalog>,
    config: PipelineConfig,
    metrics: Arc<PipelineMetrics>,
}

impl NicheAnalyzer {
    /// Analyzer over the built-in lexicon and niche catalog
    pub fn new(
        config: PipelineConfig,
        provider: Option<Arc<dyn LlmProvider>>,
        registrar: Arc<dyn Registrar>,
    ) -> Self {
        Self::with_tables(
            config,
            Lexicon::builtin(),
            Arc::new(NicheCatalog::new()),
            provider,
            registrar,
        )
    }

    pub fn with_tables(
        config: PipelineConfig,
        lexicon: Arc<Lexicon>,
        catalog: Arc<NicheCatalog>,
        provider: Option<Arc<dyn LlmProvider>>,
        registrar: Arc<dyn Registrar>,
    ) -> Self {
        let metrics = Arc::new(PipelineMetrics::new());
        let collaborator = match provider {
            Some(provider) => TextCollaborator::new(provider, Arc::clone(&metrics)),
            None => TextCollaborator::disabled(Arc::clone(&metrics)),
        };

        let aggregator = PatternAggregator::new(lexicon, Arc::clone(&catalog));
        let generator = CandidateGenerator::new(
            Arc::clone(&catalog),
            collaborator.clone(),
            config.generation.clone(),
        );
        let scorer = QualityScorer::new(collaborator.clone(), config.rank.delegated_scoring);
        let ranker = Ranker::new(registrar, scorer, config.rank.clone(), Arc::clone(&metrics));

        Self {
            aggregator,
            generator,
            ranker,
            collaborator,
            catalog,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &NicheCatalog {
        &self.catalog
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.get_stats()
    }

    /// Analyze a niche, starting from its catalog competitors or a generated list
    pub async fn analyze(&self, niche: &str) -> AnalysisReport {
        let started_at = Utc::now();
        if niche.trim().is_empty() {
            let profile = NicheProfile {
                niche: String::new(),
                source: CompetitorSource::Provided,
                competitors: Vec::new(),
            };
            return self.failed(niche, profile, started_at, "niche is empty");
        }

        let seed = self.keyword_seed(niche).await;
        let profile = self.profile(niche, &seed).await;
        self.run(niche, profile, seed, started_at).await
    }

    /// Analyze a caller-supplied competitor list
    pub async fn analyze_domains(&self, domains: &[String], niche: &str) -> AnalysisReport {
        let started_at = Utc::now();
        let profile = NicheProfile {
            niche: niche.trim().to_string(),
            source: CompetitorSource::Provided,
            competitors: domains.to_vec(),
        };
        if niche.trim().is_empty() {
            return self.failed(niche, profile, started_at, "niche is empty");
        }

        let seed = self.keyword_seed(niche).await;
        self.run(niche, profile, seed, started_at).await
    }

    /// Competitor domains for a niche: the catalog entry, else a generated list
    pub async fn profile(&self, niche: &str, seed: &KeywordSeed) -> NicheProfile {
        if let Some((key, competitors)) = self.catalog.competitors(niche) {
            tracing::debug!(niche = %niche, key = %key, competitors = competitors.len(), "Catalog niche");
            return NicheProfile {
                niche: niche.trim().to_string(),
                source: CompetitorSource::Catalog { key },
                competitors,
            };
        }

        NicheProfile {
            niche: niche.trim().to_string(),
            source: CompetitorSource::Generated,
            competitors: self.generator.generate_competitors(niche, seed).await,
        }
    }

    /// Static keyword seed, replaced by a delegated list when enabled
    async fn keyword_seed(&self, niche: &str) -> KeywordSeed {
        let seed = self.aggregator.keyword_seed(niche);
        if !self.config.llm_keywords {
            return seed;
        }

        let source = seed.source.clone();
        self.collaborator
            .ask_list(&prompts::keywords(niche))
            .await
            .and_then(|raw| {
                let mut seen = HashSet::new();
                let keywords: Vec<String> = raw
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty() && seen.insert(k.clone()))
                    .collect();
                if keywords.is_empty() {
                    Resolution::fallback(FallbackReason::Empty)
                } else {
                    Resolution::Ok(KeywordSeed { source, keywords })
                }
            })
            .resolve_counted("keyword extraction", &self.metrics, || seed)
    }

    /// Local tokenization, optionally replaced per label by a delegated split
    async fn tokenize(&self, labels: &[DomainLabel]) -> Vec<TokenizedDomain> {
        let local = self.aggregator.tokenize_all(labels);
        if !self.config.llm_segmentation || !self.collaborator.is_enabled() {
            return local;
        }

        let semaphore = Semaphore::new(self.config.rank.concurrent_checks.max(1));
        let futures = local
            .into_iter()
            .map(|domain| self.delegated_split(domain, &semaphore));
        join_all(futures).await
    }

    async fn delegated_split(&self, domain: TokenizedDomain, semaphore: &Semaphore) -> TokenizedDomain {
        // the semaphore is never closed, so a failed acquire only skips the bound
        let _permit = semaphore.acquire().await.ok();
        let label = domain.label.clone();
        let text = label.as_str().to_string();

        self.collaborator
            .ask_list(&prompts::segmentation(&text))
            .await
            .and_then(|parts| {
                let parts: Vec<String> = parts.into_iter().map(|p| p.trim().to_lowercase()).collect();
                if parts.concat() != text {
                    return Resolution::fallback(FallbackReason::SchemaMismatch(format!(
                        "split does not rebuild '{}'",
                        text
                    )));
                }
                Resolution::Ok(
                    parts
                        .into_iter()
                        .filter(|p| p.chars().count() > 1 || matches!(p.as_str(), "s" | "z"))
                        .collect::<Vec<_>>(),
                )
            })
            .map(|words| TokenizedDomain { label, words })
            .resolve_counted("segmentation", &self.metrics, || domain)
    }

    /// Industry terms chosen by the collaborator from the recurring words.
    /// Answers are limited to listed candidates; an unusable answer keeps the
    /// longer candidates instead.
    async fn industry_terms(&self, niche: &str, tokenized: &[TokenizedDomain]) -> Vec<String> {
        let candidates = self.aggregator.industry_candidates(tokenized);
        if candidates.is_empty() {
            return Vec::new();
        }

        self.collaborator
            .ask_list(&prompts::industry_terms(niche, &candidates))
            .await
            .and_then(|raw| {
                let mut seen = HashSet::new();
                let terms: Vec<String> = raw
                    .into_iter()
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| candidates.iter().any(|(word, _)| word == t) && seen.insert(t.clone()))
                    .take(MAX_INDUSTRY_TERMS)
                    .collect();
                if terms.is_empty() {
                    Resolution::fallback(FallbackReason::SchemaMismatch("no listed candidate kept".to_string()))
                } else {
                    Resolution::Ok(terms)
                }
            })
            .resolve_counted("industry terms", &self.metrics, || fallback_industry_terms(&candidates))
    }

    async fn run(&self, niche: &str, profile: NicheProfile, seed: KeywordSeed, started_at: DateTime<Utc>) -> AnalysisReport {
        let run_start = Instant::now();
        let mut stage = StageTracker::new(niche);

        stage.advance(PipelineStage::Tokenizing);
        let labels: Vec<DomainLabel> = profile.competitors.iter().map(|d| DomainLabel::parse(d)).collect();
        let tokenized = self.tokenize(&labels).await;

        stage.advance(PipelineStage::Aggregating);
        let patterns = if self.config.llm_industry_terms {
            let terms = self.industry_terms(niche, &tokenized).await;
            self.aggregator.aggregate_with_terms(&tokenized, &seed, terms)
        } else {
            self.aggregator.aggregate_tokenized(&tokenized, &seed)
        };
        let advice = advise(&patterns);

        let policy = self.config.retry;
        let mut excluded = normalize_excluded(&profile.competitors, &self.config.generation.suffix);
        let mut best: Vec<CandidateDomain> = Vec::new();
        let mut attempts = 0;
        let mut outcome = None;

        for attempt in 1..=policy.max_attempts.max(1) {
            stage.advance(PipelineStage::Generating);
            let candidates = self.generator.generate(&patterns, niche, &excluded).await;
            if candidates.is_empty() {
                tracing::info!(niche = %niche, attempt, "No new candidates; stopping");
                if best.is_empty() {
                    outcome = Some(Outcome::Failed {
                        reason: "no candidates could be generated".to_string(),
                    });
                }
                break;
            }
            excluded.extend(candidates.iter().cloned());

            stage.advance(PipelineStage::Ranking);
            best.extend(self.ranker.rank(&candidates, niche, &patterns).await);
            sort_ranked(&mut best);
            assign_reasons(&mut best);
            attempts = attempt;

            let viable = best.iter().filter(|c| c.is_viable(policy.price_ceiling)).count();
            tracing::info!(
                niche = %niche,
                attempt,
                candidates = candidates.len(),
                viable,
                min_viable = policy.min_viable,
                "Attempt finished"
            );
            if viable >= policy.min_viable {
                outcome = Some(Outcome::Done);
                break;
            }
        }

        let outcome = outcome.unwrap_or(Outcome::Exhausted { attempts });
        if let Outcome::Failed { reason } = &outcome {
            tracing::warn!(niche = %niche, reason = %reason, "Analysis failed");
            stage.advance(PipelineStage::Failed);
            best.clear();
        } else {
            stage.advance(PipelineStage::Done);
        }

        tracing::info!(
            niche = %niche,
            attempts,
            recommendations = best.len(),
            duration_ms = %run_start.elapsed().as_millis(),
            "Analysis completed"
        );

        AnalysisReport {
            niche: niche.trim().to_string(),
            profile,
            patterns,
            advice,
            recommendations: best,
            outcome,
            attempts,
            metrics: self.metrics.get_stats(),
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn failed(&self, niche: &str, profile: NicheProfile, started_at: DateTime<Utc>, reason: &str) -> AnalysisReport {
        let mut stage = StageTracker::new(niche);
        stage.advance(PipelineStage::Failed);
        tracing::warn!(niche = %niche, reason = %reason, "Analysis failed");

        AnalysisReport {
            niche: niche.trim().to_string(),
            profile,
            patterns: DomainPatterns::default(),
            advice: Vec::new(),
            recommendations: Vec::new(),
            outcome: Outcome::Failed {
                reason: reason.to_string(),
            },
            attempts: 0,
            metrics: self.metrics.get_stats(),
            started_at,
            finished_at: Utc::now(),
        }
    }
}
