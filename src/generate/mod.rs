//! Candidate domain generation

pub mod rules;

pub use rules::{basic_suggestions, rule_based};

use crate::domain::{DomainLabel, DomainValidator};
use crate::fallback::{FallbackReason, Resolution};
use crate::lexicon::{KeywordSeed, NicheCatalog};
use crate::llm::{prompts, TextCollaborator};
use crate::types::{DomainPatterns, GenerationConfig, GenerationStrategy};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, deduplicated set of full domains that skips excluded entries
struct CandidateSet<'a> {
    domains: Vec<String>,
    seen: HashSet<String>,
    excluded: &'a HashSet<String>,
}

impl<'a> CandidateSet<'a> {
    fn new(excluded: &'a HashSet<String>) -> Self {
        Self {
            domains: Vec::new(),
            seen: HashSet::new(),
            excluded,
        }
    }

    fn push(&mut self, domain: String) -> bool {
        if self.excluded.contains(&domain) || !self.seen.insert(domain.clone()) {
            return false;
        }
        self.domains.push(domain);
        true
    }

    fn len(&self) -> usize {
        self.domains.len()
    }
}

/// Exclusion list in candidate form: each entry reduced to its label and
/// given `suffix`, so "FirePitStore" and "https://firepitstore.com/" match
/// the generated "firepitstore.com"
pub fn normalize_excluded<'a>(domains: impl IntoIterator<Item = &'a String>, suffix: &str) -> HashSet<String> {
    domains
        .into_iter()
        .map(|d| DomainLabel::parse(d))
        .filter(|label| !label.is_empty())
        .map(|label| label.with_suffix(suffix))
        .collect()
}

/// Produces candidate domains from a pattern summary
#[derive(Clone)]
pub struct CandidateGenerator {
    catalog: Arc<NicheCatalog>,
    collaborator: TextCollaborator,
    config: GenerationConfig,
    validator: DomainValidator,
}

impl CandidateGenerator {
    pub fn new(catalog: Arc<NicheCatalog>, collaborator: TextCollaborator, config: GenerationConfig) -> Self {
        let validator = DomainValidator::new(config.min_label_length, config.max_label_length);
        Self {
            catalog,
            collaborator,
            config,
            validator,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Normalize a raw suggestion into a suffixed domain, if it is a valid label
    fn to_domain(&self, raw: &str) -> Option<String> {
        let label = DomainLabel::parse(raw);
        match self.validator.validate(&label) {
            Ok(()) => Some(label.with_suffix(&self.config.suffix)),
            Err(e) => {
                tracing::trace!(candidate = %raw, error = %e, "Dropping invalid candidate");
                None
            }
        }
    }

    fn extend(&self, set: &mut CandidateSet<'_>, raw: impl IntoIterator<Item = String>, limit: usize) {
        for candidate in raw {
            if set.len() >= limit {
                break;
            }
            if let Some(domain) = self.to_domain(&candidate) {
                set.push(domain);
            }
        }
    }

    /// Generate up to the target count of new domains for `niche`.
    ///
    /// Output never contains an entry of `excluded`, has no duplicates and every
    /// entry carries the configured suffix.
    pub async fn generate(&self, patterns: &DomainPatterns, niche: &str, excluded: &HashSet<String>) -> Vec<String> {
        let excluded = normalize_excluded(excluded, &self.config.suffix);
        let target = self.config.target_count;
        let mut set = CandidateSet::new(&excluded);

        match self.config.strategy {
            GenerationStrategy::RuleBased => {
                self.extend(&mut set, rule_based(patterns), target);
            }
            GenerationStrategy::Delegated => {
                let suggested = self.delegated(patterns, niche, &excluded).await;
                self.extend(&mut set, suggested, target);
                // top up with local combinations
                self.extend(&mut set, rule_based(patterns), target);
                self.extend(&mut set, basic_suggestions(niche), target);
            }
        }

        self.collaborator
            .metrics()
            .add_candidates_generated(set.len());
        tracing::debug!(
            niche = %niche,
            strategy = %self.config.strategy,
            generated = set.len(),
            excluded = excluded.len(),
            "Candidates generated"
        );
        set.domains
    }

    /// Competitor length range clamped to the configured label bounds; never inverted
    fn length_bounds(&self, patterns: &DomainPatterns) -> (usize, usize) {
        let max = match patterns.length_range.max {
            0 => self.config.max_label_length,
            observed => observed.min(self.config.max_label_length),
        };
        let min = patterns.length_range.min.max(self.config.min_label_length).min(max);
        (min, max)
    }

    /// Delegated suggestions, or the rule-based list when the answer is unusable
    async fn delegated(&self, patterns: &DomainPatterns, niche: &str, excluded: &HashSet<String>) -> Vec<String> {
        let mut excluded_list: Vec<String> = excluded.iter().cloned().collect();
        excluded_list.sort();

        let (min_length, max_length) = self.length_bounds(patterns);
        let instruction = prompts::suggestions(
            niche,
            patterns,
            &excluded_list,
            self.config.target_count,
            min_length,
            max_length,
            &self.config.suffix,
        );

        self.collaborator
            .ask_list(&instruction)
            .await
            .and_then(|raw| {
                let usable: Vec<String> = raw
                    .into_iter()
                    .filter(|s| self.to_domain(s).is_some_and(|d| !excluded.contains(&d)))
                    .collect();
                if usable.is_empty() {
                    Resolution::fallback(FallbackReason::SchemaMismatch("no usable suggestions".to_string()))
                } else {
                    Resolution::Ok(usable)
                }
            })
            .resolve_counted("candidate suggestions", self.collaborator.metrics(), || rule_based(patterns))
    }

    /// Competitor-style domains for a niche missing from the catalog
    pub async fn generate_competitors(&self, niche: &str, seed: &KeywordSeed) -> Vec<String> {
        let count = self.config.competitor_count;
        let instruction = prompts::competitors(niche, &seed.keywords, count);

        let to_competitors = |raw: Vec<String>| -> Vec<String> {
            let mut seen = HashSet::new();
            let domains = raw
                .iter()
                .map(|r| DomainLabel::parse(r))
                .filter(|label| !label.is_empty())
                .map(|label| label.with_suffix("com"))
                .filter(|domain| seen.insert(domain.clone()))
                .collect();
            let mut domains = self.catalog.without_excluded(domains);
            domains.truncate(count);
            domains
        };

        let domains = self
            .collaborator
            .ask_list(&instruction)
            .await
            .and_then(|raw| match to_competitors(raw) {
                domains if domains.is_empty() => Resolution::fallback(FallbackReason::Empty),
                domains => Resolution::Ok(domains),
            })
            .resolve_counted("competitor generation", self.collaborator.metrics(), || {
                to_competitors(basic_suggestions(niche))
            });

        tracing::info!(niche = %niche, competitors = domains.len(), "Generated competitor list");
        domains
    }
}
