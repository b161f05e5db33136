//! Availability checks, scoring and ordering of candidates

pub mod scorer;

pub use scorer::{heuristic_score, QualityScorer};

use crate::domain::{DomainLabel, Registrar};
use crate::types::{CandidateDomain, DomainPatterns, PipelineMetrics, RankConfig};
use chrono::Utc;
use futures::future::join_all;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

pub const REASON_TOP: &str = "optimal length and structure";
pub const REASON_SHORT: &str = "short and memorable";
pub const REASON_BALANCED: &str = "good balance of length";
pub const REASON_DESCRIPTIVE: &str = "descriptive and clear";

/// Higher score first, then available before unavailable. Unscored counts as 0.
pub fn compare_ranked(a: &CandidateDomain, b: &CandidateDomain) -> Ordering {
    b.quality_score
        .unwrap_or(0)
        .cmp(&a.quality_score.unwrap_or(0))
        .then_with(|| b.available.cmp(&a.available))
}

/// Stable sort by [`compare_ranked`]
pub fn sort_ranked(candidates: &mut [CandidateDomain]) {
    candidates.sort_by(compare_ranked);
}

/// Short explanation for a ranked position
pub fn reason_for(label: &str, is_top: bool) -> &'static str {
    if is_top {
        return REASON_TOP;
    }
    match label.chars().count() {
        0..=12 => REASON_SHORT,
        13..=16 => REASON_BALANCED,
        _ => REASON_DESCRIPTIVE,
    }
}

/// Annotate an already sorted list with [`reason_for`]
pub fn assign_reasons(ranked: &mut [CandidateDomain]) {
    for (position, candidate) in ranked.iter_mut().enumerate() {
        candidate.reason = Some(reason_for(&candidate.label, position == 0).to_string());
    }
}

/// Checks, scores and orders candidates
#[derive(Clone)]
pub struct Ranker {
    registrar: Arc<dyn Registrar>,
    scorer: QualityScorer,
    config: RankConfig,
    metrics: Arc<PipelineMetrics>,
}

impl Ranker {
    pub fn new(
        registrar: Arc<dyn Registrar>,
        scorer: QualityScorer,
        config: RankConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            registrar,
            scorer,
            config,
            metrics,
        }
    }

    /// Rank `candidates` for `niche`.
    ///
    /// Registrar and scorer calls run concurrently, bounded by
    /// `concurrent_checks`; results are recombined in input order before the
    /// stable sort, so equal candidates keep their generation order.
    pub async fn rank(&self, candidates: &[String], niche: &str, patterns: &DomainPatterns) -> Vec<CandidateDomain> {
        let batch_start = Instant::now();
        let semaphore = Semaphore::new(self.config.concurrent_checks.max(1));

        let futures = candidates
            .iter()
            .map(|domain| self.evaluate(domain, niche, patterns, &semaphore));
        let mut ranked = join_all(futures).await;

        sort_ranked(&mut ranked);
        assign_reasons(&mut ranked);

        tracing::info!(
            niche = %niche,
            candidates = ranked.len(),
            available = ranked.iter().filter(|c| c.available).count(),
            registrar = self.registrar.name(),
            duration_ms = %batch_start.elapsed().as_millis(),
            "Ranking completed"
        );
        ranked
    }

    async fn evaluate(
        &self,
        domain: &str,
        niche: &str,
        patterns: &DomainPatterns,
        semaphore: &Semaphore,
    ) -> CandidateDomain {
        // the semaphore is never closed, so a failed acquire only skips the bound
        let _permit = semaphore.acquire().await.ok();

        let label = DomainLabel::parse(domain);
        let mut candidate = CandidateDomain::new(domain, label.as_str());

        self.metrics.increment_registrar_checks();
        match self.registrar.check_availability(domain).await {
            Ok(quote) => {
                candidate.available = quote.available;
                candidate.price = quote.price;
                candidate.error = quote.error;
            }
            Err(e) => {
                self.metrics.increment_registrar_failures();
                tracing::warn!(domain = %domain, error = %e, "Availability check failed; treating as unavailable");
                candidate.available = false;
                candidate.price = None;
                candidate.error = Some(e.to_string());
            }
        }
        candidate.checked_at = Some(Utc::now());

        if candidate.available || self.config.score_unavailable {
            let (score, source) = self.scorer.score(domain, label.as_str(), niche, patterns).await;
            candidate.quality_score = Some(score);
            candidate.score_source = Some(source);
        }

        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NicheForgeError, Result};
    use crate::llm::TextCollaborator;
    use crate::types::{AvailabilityQuote, ScoreSource};
    use async_trait::async_trait;

    /// Available unless the label is listed as taken; "broken" labels fail with a 500
    struct StubRegistrar {
        taken: Vec<&'static str>,
    }

    #[async_trait]
    impl Registrar for StubRegistrar {
        async fn check_availability(&self, domain: &str) -> Result<AvailabilityQuote> {
            if domain.starts_with("broken") {
                return Err(NicheForgeError::registrar(domain, "API request failed (500)", Some(500)));
            }
            Ok(AvailabilityQuote {
                domain: domain.to_string(),
                available: !self.taken.iter().any(|t| domain.starts_with(t)),
                price: Some(12.99),
                error: None,
            })
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn ranker(taken: Vec<&'static str>, config: RankConfig) -> (Ranker, Arc<PipelineMetrics>) {
        let metrics = Arc::new(PipelineMetrics::new());
        let scorer = QualityScorer::new(TextCollaborator::disabled(metrics.clone()), false);
        let ranker = Ranker::new(Arc::new(StubRegistrar { taken }), scorer, config, metrics.clone());
        (ranker, metrics)
    }

    fn backyard() -> DomainPatterns {
        DomainPatterns {
            niche_keywords: vec!["porch".into()],
            ..Default::default()
        }
    }

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[tokio::test]
    async fn test_sorted_by_score_then_availability() {
        let (ranker, _) = ranker(vec!["porchhub"], RankConfig::default());
        let ranked = ranker
            .rank(
                &domains(&["yardhub.com", "porchhub.com", "porchcentral.com", "verylongbackyardname.com"]),
                "backyard",
                &backyard(),
            )
            .await;

        let order: Vec<&str> = ranked.iter().map(|c| c.domain.as_str()).collect();
        // porchhub and porchcentral both score 85; the available one goes first
        assert_eq!(
            order,
            vec!["porchcentral.com", "porchhub.com", "yardhub.com", "verylongbackyardname.com"]
        );
        assert!(ranked
            .windows(2)
            .all(|w| w[0].quality_score >= w[1].quality_score));
        assert_eq!(ranked[0].reason.as_deref(), Some(REASON_TOP));
        assert_eq!(ranked[2].reason.as_deref(), Some(REASON_SHORT));
        assert_eq!(ranked[3].reason.as_deref(), Some(REASON_DESCRIPTIVE));
        assert!(ranked.iter().all(|c| c.score_source == Some(ScoreSource::Heuristic)));
    }

    #[tokio::test]
    async fn test_registrar_error_means_unavailable() {
        let (ranker, metrics) = ranker(vec![], RankConfig::default());
        let ranked = ranker
            .rank(&domains(&["brokenporch.com"]), "backyard", &backyard())
            .await;

        assert_eq!(ranked.len(), 1);
        assert!(!ranked[0].available);
        assert_eq!(ranked[0].price, None);
        assert!(ranked[0].error.is_some());
        let stats = metrics.get_stats();
        assert_eq!(stats.registrar_checks, 1);
        assert_eq!(stats.registrar_failures, 1);
    }

    #[tokio::test]
    async fn test_unavailable_left_unscored_when_configured() {
        let config = RankConfig {
            score_unavailable: false,
            concurrent_checks: 1,
            ..Default::default()
        };
        let (ranker, _) = ranker(vec!["porch"], config);
        let ranked = ranker
            .rank(&domains(&["porchcentral.com", "yardhub.com"]), "backyard", &backyard())
            .await;

        assert_eq!(ranked[0].domain, "yardhub.com");
        assert_eq!(ranked[1].quality_score, None);
        assert!(ranked[1].checked_at.is_some());
    }

    #[test]
    fn test_sort_is_stable_for_full_ties() {
        let mut list: Vec<CandidateDomain> = ["a.com", "b.com", "c.com"]
            .iter()
            .map(|d| {
                let mut c = CandidateDomain::new(*d, &d[..1]);
                c.quality_score = Some(70);
                c
            })
            .collect();
        sort_ranked(&mut list);
        let order: Vec<&str> = list.iter().map(|c| c.domain.as_str()).collect();
        assert_eq!(order, vec!["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_reason_bands() {
        assert_eq!(reason_for("porchcentral", false), REASON_SHORT);
        assert_eq!(reason_for("porchcentralhub", false), REASON_BALANCED);
        assert_eq!(reason_for("porchcentralhubstore", false), REASON_DESCRIPTIVE);
        assert_eq!(reason_for("x", true), REASON_TOP);
    }
}
