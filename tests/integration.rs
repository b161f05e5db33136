//! Integration tests for niche-forge

use async_trait::async_trait;
use niche_forge::{
    analysis::patterns::NICHE_PLUS_BUSINESS,
    generate::normalize_excluded,
    heuristic_score,
    llm::TextCollaborator,
    types::{AvailabilityQuote, GenerationStrategy, PipelineMetrics, RankConfig},
    CandidateGenerator, DomainLabel, DomainPatterns, Lexicon, LlmProvider, NicheAnalyzer,
    NicheCatalog, NicheForgeError, Outcome, PatternAggregator, PipelineConfig, QualityScorer,
    Ranker, Registrar, Result, ScoreSource, Tokenizer,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Returns the same text for every instruction
struct EchoProvider(&'static str);

#[async_trait]
impl LlmProvider for EchoProvider {
    async fn complete(&self, _instruction: &str) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &'static str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Taken for listed labels, HTTP 500 for labels starting with "down"
struct MockRegistrar {
    taken: HashSet<&'static str>,
}

#[async_trait]
impl Registrar for MockRegistrar {
    async fn check_availability(&self, domain: &str) -> Result<AvailabilityQuote> {
        if domain.starts_with("down") {
            return Err(NicheForgeError::registrar(domain, "API request failed (500)", Some(500)));
        }
        Ok(AvailabilityQuote {
            domain: domain.to_string(),
            available: !self.taken.contains(domain),
            price: Some(12.99),
            error: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

fn registrar(taken: &[&'static str]) -> Arc<dyn Registrar> {
    Arc::new(MockRegistrar {
        taken: taken.iter().copied().collect(),
    })
}

fn backyard_competitors() -> Vec<String> {
    ["firepitsdirect.com", "firepitsurplus.com", "theporchswingcompany.com"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

#[test]
fn test_segmentation_is_lossless() {
    let tokenizer = Tokenizer::new(Lexicon::builtin());
    for label in ["firepitsdirect", "theporchswingcompany", "saunaz", "xqzv", "golf4u", "a"] {
        let rebuilt: String = tokenizer.segment(label).iter().map(|t| t.as_str()).collect();
        assert_eq!(rebuilt, label);
    }
}

#[test]
fn test_backyard_patterns() {
    let aggregator = PatternAggregator::new(Lexicon::builtin(), Arc::new(NicheCatalog::new()));
    let labels: Vec<DomainLabel> = backyard_competitors().iter().map(|d| DomainLabel::parse(d)).collect();
    let patterns = aggregator.aggregate(&labels, "backyard");

    assert!(patterns.niche_keywords.iter().any(|k| k == "fire"));
    assert!(patterns.structure_patterns.iter().any(|s| s == NICHE_PLUS_BUSINESS));
    assert_eq!(patterns.contains_numbers_count, 0);
    assert!(patterns.length_range.min <= patterns.average_length);
    assert!(patterns.average_length <= patterns.length_range.max);

    assert_eq!(aggregator.aggregate(&[], "backyard"), DomainPatterns::default());
}

#[test]
fn test_heuristic_prefers_clean_mid_length_names() {
    let patterns = DomainPatterns {
        niche_keywords: vec!["porch".to_string()],
        ..Default::default()
    };
    assert_eq!(heuristic_score("porchcentral", &patterns), 85);
    assert!(heuristic_score("porchswing", &patterns) > heuristic_score("porchswingsupplystore1234", &patterns));

    // the scorer future resolves without a runtime-bound collaborator
    let scorer = QualityScorer::new(TextCollaborator::disabled(Arc::new(PipelineMetrics::new())), false);
    let (score, source) = tokio_test::block_on(scorer.score("porchcentral.com", "porchcentral", "backyard", &patterns));
    assert_eq!((score, source), (85, ScoreSource::Heuristic));
}

#[tokio::test]
async fn test_registrar_failure_is_unavailable() {
    let metrics = Arc::new(PipelineMetrics::new());
    let scorer = QualityScorer::new(TextCollaborator::disabled(metrics.clone()), false);
    let ranker = Ranker::new(registrar(&[]), scorer, RankConfig::default(), metrics.clone());

    let ranked = ranker
        .rank(
            &["downporch.com".to_string(), "porchcentral.com".to_string()],
            "backyard",
            &DomainPatterns::default(),
        )
        .await;

    assert_eq!(ranked.len(), 2);
    let down = ranked.iter().find(|c| c.domain == "downporch.com").unwrap();
    assert!(!down.available);
    assert_eq!(down.price, None);
    assert_eq!(metrics.get_stats().registrar_failures, 1);
}

#[tokio::test]
async fn test_malformed_suggestions_fall_back() {
    let metrics = Arc::new(PipelineMetrics::new());
    let collaborator = TextCollaborator::new(Arc::new(EchoProvider("not json")), metrics.clone());
    let generator = CandidateGenerator::new(Arc::new(NicheCatalog::new()), collaborator, Default::default());

    let patterns = DomainPatterns {
        niche_keywords: vec!["porch".to_string(), "fire".to_string()],
        suffixes: vec!["direct".to_string()],
        ..Default::default()
    };
    let excluded = normalize_excluded(&vec!["PorchDirect.com".to_string()], "com");
    let domains = generator.generate(&patterns, "backyard", &excluded).await;

    assert!(!domains.is_empty());
    assert!(domains.iter().all(|d| d.ends_with(".com")));
    assert!(!domains.contains(&"porchdirect.com".to_string()));
    let unique: HashSet<&String> = domains.iter().collect();
    assert_eq!(unique.len(), domains.len());
    assert!(metrics.get_stats().fallbacks >= 1);
}

#[tokio::test]
async fn test_end_to_end_with_collaborators() {
    let provider = EchoProvider(r#"["porchharbor.com", "firelantern.com", "porchmeadow.com", "downyard.com"]"#);
    let mut config = PipelineConfig::default();
    config.generation.strategy = GenerationStrategy::Delegated;
    config.rank.delegated_scoring = false;
    config.retry.min_viable = 2;

    let analyzer = NicheAnalyzer::new(
        config,
        Some(Arc::new(provider)),
        registrar(&["porchmeadow.com"]),
    );
    let report = analyzer.analyze_domains(&backyard_competitors(), "backyard").await;

    assert_eq!(report.outcome, Outcome::Done);
    assert_eq!(report.attempts, 1);
    assert!(report.recommendations.len() > 2);

    let ranked = &report.recommendations;
    assert!(ranked.windows(2).all(|w| {
        let (a, b) = (w[0].quality_score.unwrap_or(0), w[1].quality_score.unwrap_or(0));
        a > b || (a == b && (w[0].available || !w[1].available))
    }));

    let domains: Vec<&str> = ranked.iter().map(|c| c.domain.as_str()).collect();
    assert!(domains.contains(&"porchharbor.com"));
    assert!(!domains.iter().any(|d| backyard_competitors().iter().any(|c| c == d)));
    assert!(!ranked.iter().find(|c| c.domain == "porchmeadow.com").unwrap().available);
    assert!(!ranked.iter().find(|c| c.domain == "downyard.com").unwrap().available);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"]["status"], "done");
    assert!(json["patterns"]["nicheKeywords"].is_array());
}
