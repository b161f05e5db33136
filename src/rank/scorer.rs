//! Candidate quality scoring

use crate::domain::validator::contains_digit;
use crate::llm::{prompts, TextCollaborator};
use crate::types::{DomainPatterns, ScoreSource};

/// Deterministic 1..=100 score from length band and pattern overlap.
///
/// Base 50; +20 for 7-12 chars, +15 for 13-16, +10 for 17-20, -10 otherwise;
/// +15 when a niche keyword is a substring, +10 for an industry term,
/// -10 for any digit, -5 for a hyphen.
pub fn heuristic_score(label: &str, patterns: &DomainPatterns) -> u8 {
    let label = label.to_lowercase();
    let mut score: i32 = 50;

    score += match label.chars().count() {
        7..=12 => 20,
        13..=16 => 15,
        17..=20 => 10,
        _ => -10,
    };

    let contains_any = |words: &[String]| words.iter().any(|w| !w.is_empty() && label.contains(w.as_str()));
    if contains_any(patterns.niche_keywords.as_slice()) {
        score += 15;
    }
    if contains_any(patterns.industry_terms.as_slice()) {
        score += 10;
    }
    if contains_digit(&label) {
        score -= 10;
    }
    if label.contains('-') {
        score -= 5;
    }

    score.clamp(1, 100) as u8
}

/// Delegated scorer with the heuristic as fallback
#[derive(Clone)]
pub struct QualityScorer {
    collaborator: TextCollaborator,
    delegated: bool,
}

impl QualityScorer {
    pub fn new(collaborator: TextCollaborator, delegated: bool) -> Self {
        Self {
            collaborator,
            delegated,
        }
    }

    pub async fn score(
        &self,
        domain: &str,
        label: &str,
        niche: &str,
        patterns: &DomainPatterns,
    ) -> (u8, ScoreSource) {
        if !self.delegated {
            return (heuristic_score(label, patterns), ScoreSource::Heuristic);
        }

        self.collaborator
            .ask_score(&prompts::score(domain, niche, patterns))
            .await
            .map(|score| (score, ScoreSource::Delegated))
            .resolve_counted("quality score", self.collaborator.metrics(), || {
                (heuristic_score(label, patterns), ScoreSource::Heuristic)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PipelineMetrics;
    use std::sync::Arc;

    fn backyard() -> DomainPatterns {
        DomainPatterns {
            niche_keywords: vec!["porch".into(), "fire".into()],
            industry_terms: vec!["grill".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_porchcentral_scores_85() {
        assert_eq!(heuristic_score("porchcentral", &backyard()), 85);
    }

    #[test]
    fn test_length_band_and_penalties() {
        let patterns = backyard();
        let short_clean = heuristic_score("porchzone", &patterns);
        let long_digit = heuristic_score("porchzonewarehouse4you123", &patterns);
        assert!(short_clean > long_digit);
        assert_eq!(long_digit, 50 - 10 + 15 - 10);

        assert_eq!(heuristic_score("fire-grill", &patterns), 50 + 20 + 15 + 10 - 5);
        assert_eq!(heuristic_score("ab", &DomainPatterns::default()), 40);
    }

    #[test]
    fn test_score_is_clamped() {
        let patterns = DomainPatterns {
            niche_keywords: vec!["a".into()],
            industry_terms: vec!["b".into()],
            ..Default::default()
        };
        for label in ["", "1", "a-b-1-2-3-4-5-6-7-8-9-0-1-2", "abcdefghij"] {
            let score = heuristic_score(label, &patterns);
            assert!((1..=100).contains(&score), "{label} scored {score}");
        }
    }

    #[test]
    fn test_empty_keywords_do_not_match_everything() {
        let patterns = DomainPatterns {
            niche_keywords: vec![String::new()],
            ..Default::default()
        };
        assert_eq!(heuristic_score("yardhub", &patterns), 70);
    }

    #[tokio::test]
    async fn test_unavailable_collaborator_uses_heuristic() {
        let metrics = Arc::new(PipelineMetrics::new());
        let scorer = QualityScorer::new(TextCollaborator::disabled(metrics.clone()), true);
        let (score, source) = scorer
            .score("porchcentral.com", "porchcentral", "backyard", &backyard())
            .await;
        assert_eq!((score, source), (85, ScoreSource::Heuristic));
        assert_eq!(metrics.get_stats().fallbacks, 1);
    }
}
