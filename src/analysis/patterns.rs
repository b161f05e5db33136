//! Aggregation of lexical features across a competitor domain set

use super::tokenizer::Tokenizer;
use crate::domain::DomainLabel;
use crate::lexicon::{KeywordSeed, Lexicon, NicheCatalog};
use crate::types::{DomainPatterns, LengthRange};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub const SINGLE_WORD: &str = "single word";
pub const NICHE_PLUS_BUSINESS: &str = "niche word + business term";
pub const ARTICLE_PLUS_WORD: &str = "article + main word";
pub const TWO_WORDS: &str = "two-word combination";
pub const THREE_WORDS: &str = "three-word combination";
pub const MULTI_WORD: &str = "multi-word phrase";

pub const BRAND_INDUSTRY: &str = "industry-specific";
pub const BRAND_COMPOUND: &str = "compound";
pub const BRAND_BRANDABLE: &str = "brandable";

pub const MAX_INDUSTRY_TERMS: usize = 10;
const FALLBACK_TERM_MIN_LENGTH: usize = 5;
const FALLBACK_TERM_CAP: usize = 5;
const MAX_COMMON_WORDS: usize = 5;
const MAX_AFFIXES: usize = 3;
const MAX_STRUCTURES: usize = 3;
const MAX_BRAND_TYPES: usize = 3;
const MIN_RECURRENCE: usize = 2;

/// A label together with its word tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedDomain {
    pub label: DomainLabel,
    pub words: Vec<String>,
}

/// Frequency table that remembers first-seen order
#[derive(Debug, Default)]
struct TermCounter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl TermCounter {
    fn add(&mut self, term: &str) {
        match self.counts.get_mut(term) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(term.to_string(), 1);
                self.order.push(term.to_string());
            }
        }
    }

    fn entries(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(|term| (term.as_str(), self.counts.get(term).copied().unwrap_or(0)))
    }

    /// Terms seen at least `min` times, first-seen order, at most `cap`
    fn recurring(&self, min: usize, cap: usize) -> Vec<String> {
        self.entries()
            .filter(|(_, count)| *count >= min)
            .take(cap)
            .map(|(term, _)| term.to_string())
            .collect()
    }
}

/// Merge adjacent compound tokens ("fire" + "pits") into one word unit
pub fn word_units(words: &[String], lexicon: &Lexicon) -> Vec<String> {
    let mut units = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        if let Some(next) = words.get(i + 1) {
            if lexicon.compounds().iter().any(|rule| rule.matches(&words[i], next)) {
                units.push(format!("{}{}", words[i], next));
                i += 2;
                continue;
            }
        }
        units.push(words[i].clone());
        i += 1;
    }
    units
}

/// Structural class of a name from its word units
pub fn classify_structure(units: &[String], lexicon: &Lexicon) -> Option<&'static str> {
    match units.len() {
        0 => None,
        1 => Some(SINGLE_WORD),
        2 if lexicon.is_business_suffix(&units[1]) => Some(NICHE_PLUS_BUSINESS),
        2 if lexicon.is_article(&units[0]) => Some(ARTICLE_PLUS_WORD),
        2 => Some(TWO_WORDS),
        3 => Some(THREE_WORDS),
        _ => Some(MULTI_WORD),
    }
}

/// Synthetic compound terms found in adjacent tokens
fn compound_terms(words: &[String], lexicon: &Lexicon) -> Vec<&'static str> {
    words
        .windows(2)
        .filter_map(|pair| {
            lexicon
                .compounds()
                .iter()
                .find(|rule| rule.matches(&pair[0], &pair[1]))
                .map(|rule| rule.joined)
        })
        .collect()
}

/// Words of one domain that feed the frequency table: tokens longer than
/// two characters followed by any compound terms
fn meaningful_words(words: &[String], lexicon: &Lexicon) -> Vec<String> {
    words
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().count() > 2)
        .chain(compound_terms(words, lexicon))
        .map(str::to_string)
        .collect()
}

fn recurring_candidates(frequency: &TermCounter, lexicon: &Lexicon) -> Vec<(String, usize)> {
    frequency
        .entries()
        .filter(|(word, count)| {
            *count >= MIN_RECURRENCE
                && word.chars().count() >= 3
                && !lexicon.is_business_suffix(word)
                && !lexicon.is_stopword(word)
        })
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}

/// Industry terms when the delegated filter is unusable: longer words only
pub fn fallback_industry_terms(candidates: &[(String, usize)]) -> Vec<String> {
    candidates
        .iter()
        .filter(|(word, _)| word.chars().count() >= FALLBACK_TERM_MIN_LENGTH)
        .take(FALLBACK_TERM_CAP)
        .map(|(word, _)| word.clone())
        .collect()
}

/// Builds [`DomainPatterns`] from competitor domains
#[derive(Debug, Clone)]
pub struct PatternAggregator {
    lexicon: Arc<Lexicon>,
    catalog: Arc<NicheCatalog>,
    tokenizer: Tokenizer,
}

impl PatternAggregator {
    pub fn new(lexicon: Arc<Lexicon>, catalog: Arc<NicheCatalog>) -> Self {
        let tokenizer = Tokenizer::new(Arc::clone(&lexicon));
        Self {
            lexicon,
            catalog,
            tokenizer,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn keyword_seed(&self, niche: &str) -> KeywordSeed {
        self.catalog.keyword_seed(niche)
    }

    /// Tokenize every non-empty label
    pub fn tokenize_all(&self, domains: &[DomainLabel]) -> Vec<TokenizedDomain> {
        domains
            .iter()
            .filter(|label| !label.is_empty())
            .map(|label| TokenizedDomain {
                label: label.clone(),
                words: self.tokenizer.words(label.as_str()),
            })
            .collect()
    }

    /// Tokenize and aggregate with the catalog keyword seed for `niche`.
    /// An empty domain set or a blank niche yields zero-valued patterns.
    pub fn aggregate(&self, domains: &[DomainLabel], niche: &str) -> DomainPatterns {
        if niche.trim().is_empty() {
            return DomainPatterns::default();
        }
        let tokenized = self.tokenize_all(domains);
        let seed = self.keyword_seed(niche);
        self.aggregate_tokenized(&tokenized, &seed)
    }

    /// Recurring words that may be industry vocabulary, with their counts,
    /// in first-seen order
    pub fn industry_candidates(&self, domains: &[TokenizedDomain]) -> Vec<(String, usize)> {
        let lexicon = self.lexicon.as_ref();
        let mut frequency = TermCounter::default();
        for domain in domains {
            for word in meaningful_words(&domain.words, lexicon) {
                frequency.add(&word);
            }
        }
        recurring_candidates(&frequency, lexicon)
    }

    /// Aggregate already tokenized domains against a keyword seed
    pub fn aggregate_tokenized(&self, domains: &[TokenizedDomain], seed: &KeywordSeed) -> DomainPatterns {
        self.aggregate_with(domains, seed, |candidates| {
            candidates
                .iter()
                .take(MAX_INDUSTRY_TERMS)
                .map(|(word, _)| word.clone())
                .collect()
        })
    }

    /// Aggregate with an externally chosen industry term list.
    /// Common words and brand types are derived from `industry_terms`.
    pub fn aggregate_with_terms(
        &self,
        domains: &[TokenizedDomain],
        seed: &KeywordSeed,
        industry_terms: Vec<String>,
    ) -> DomainPatterns {
        self.aggregate_with(domains, seed, |_| industry_terms)
    }

    fn aggregate_with(
        &self,
        domains: &[TokenizedDomain],
        seed: &KeywordSeed,
        select_terms: impl FnOnce(&[(String, usize)]) -> Vec<String>,
    ) -> DomainPatterns {
        let mut patterns = DomainPatterns::default();
        if domains.is_empty() {
            return patterns;
        }

        let lexicon = self.lexicon.as_ref();
        let mut total_length = 0usize;
        let mut min_length = usize::MAX;
        let mut max_length = 0usize;
        let mut frequency = TermCounter::default();
        let mut meaningful: Vec<String> = Vec::new();
        let mut structures: Vec<&'static str> = Vec::new();

        for domain in domains {
            let length = domain.label.len();
            total_length += length;
            min_length = min_length.min(length);
            max_length = max_length.max(length);

            for word in meaningful_words(&domain.words, lexicon) {
                frequency.add(&word);
                meaningful.push(word);
            }

            if !domain.words.is_empty() {
                *patterns
                    .word_count_histogram
                    .entry(domain.words.len())
                    .or_insert(0) += 1;
            }

            if domain.label.has_digit() {
                patterns.contains_numbers_count += 1;
            }

            let units = word_units(&domain.words, lexicon);
            if let Some(structure) = classify_structure(&units, lexicon) {
                if !structures.contains(&structure) {
                    structures.push(structure);
                }
            }
        }

        patterns.average_length = total_length / domains.len();
        patterns.length_range = LengthRange {
            min: min_length,
            max: max_length,
        };

        // Ties go to the smallest word count
        patterns.most_common_word_count = patterns
            .word_count_histogram
            .iter()
            .fold(None::<(usize, usize)>, |best, (&words, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((words, count)),
            })
            .map(|(words, _)| words)
            .unwrap_or(0);

        patterns.industry_terms = select_terms(&recurring_candidates(&frequency, lexicon));

        patterns.common_words = frequency
            .entries()
            .filter(|(word, count)| {
                *count >= MIN_RECURRENCE
                    && !patterns.industry_terms.iter().any(|t| t == word)
                    && !lexicon.is_stopword(word)
                    && !lexicon.is_business_suffix(word)
            })
            .take(MAX_COMMON_WORDS)
            .map(|(word, _)| word.to_string())
            .collect();

        let mut seen = HashSet::new();
        patterns.niche_keywords = meaningful
            .iter()
            .filter(|word| seed.contains(word) && seen.insert(word.as_str()))
            .cloned()
            .collect();

        patterns.structure_patterns = structures
            .into_iter()
            .take(MAX_STRUCTURES)
            .map(str::to_string)
            .collect();

        let (suffixes, prefixes) = self.count_affixes(domains);
        patterns.suffixes = suffixes.recurring(MIN_RECURRENCE, MAX_AFFIXES);
        patterns.prefixes = prefixes.recurring(MIN_RECURRENCE, MAX_AFFIXES);

        let meaningful: HashSet<&str> = meaningful.iter().map(String::as_str).collect();
        patterns.brand_types = self
            .count_brand_types(domains, &patterns.industry_terms, &meaningful)
            .recurring(MIN_RECURRENCE, MAX_BRAND_TYPES);

        patterns
    }

    fn count_affixes(&self, domains: &[TokenizedDomain]) -> (TermCounter, TermCounter) {
        let mut suffixes = TermCounter::default();
        let mut prefixes = TermCounter::default();

        for words in domains.iter().map(|d| &d.words).filter(|w| w.len() > 1) {
            if let Some(last) = words.last().filter(|w| self.lexicon.is_business_suffix(w)) {
                suffixes.add(last);
            }
            if let Some(first) = words.first().filter(|w| self.lexicon.is_descriptive_prefix(w)) {
                prefixes.add(first);
            }
        }

        (suffixes, prefixes)
    }

    fn count_brand_types(
        &self,
        domains: &[TokenizedDomain],
        industry_terms: &[String],
        meaningful: &HashSet<&str>,
    ) -> TermCounter {
        let mut brands = TermCounter::default();

        for words in domains.iter().map(|d| &d.words) {
            if words.iter().any(|w| industry_terms.contains(w)) {
                brands.add(BRAND_INDUSTRY);
            }
            if words.len() >= 2 {
                brands.add(BRAND_COMPOUND);
            }
            if words.len() == 1 && !meaningful.contains(words[0].as_str()) {
                brands.add(BRAND_BRANDABLE);
            }
        }

        brands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> PatternAggregator {
        PatternAggregator::new(Lexicon::builtin(), Arc::new(NicheCatalog::new()))
    }

    fn labels(domains: &[&str]) -> Vec<DomainLabel> {
        domains.iter().map(|d| DomainLabel::parse(d)).collect()
    }

    #[test]
    fn test_backyard_scenario() {
        let patterns = aggregator().aggregate(
            &labels(&["firepitsdirect.com", "firepitsurplus.com", "theporchswingcompany.com"]),
            "backyard",
        );

        assert!(patterns.niche_keywords.contains(&"fire".to_string()));
        assert!(patterns
            .structure_patterns
            .contains(&NICHE_PLUS_BUSINESS.to_string()));
        assert_eq!(patterns.contains_numbers_count, 0);
        assert_eq!(patterns.length_range, LengthRange { min: 14, max: 20 });
        assert_eq!(patterns.average_length, 16);
        assert_eq!(patterns.industry_terms, vec!["fire", "pits", "firepit"]);
        assert!(patterns.common_words.is_empty());
        assert_eq!(patterns.most_common_word_count, 4);
        assert_eq!(patterns.brand_types, vec![BRAND_INDUSTRY, BRAND_COMPOUND]);
    }

    #[test]
    fn test_empty_set_is_zero_valued() {
        let patterns = aggregator().aggregate(&[], "backyard");
        assert_eq!(patterns, DomainPatterns::default());
        assert_eq!(patterns.average_length, 0);
        assert_eq!(patterns.length_range, LengthRange { min: 0, max: 0 });
        assert_eq!(patterns.most_common_word_count, 0);
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_blank_niche_is_zero_valued() {
        let patterns = aggregator().aggregate(&labels(&["bbqguys.com"]), "  ");
        assert_eq!(patterns, DomainPatterns::default());
    }

    #[test]
    fn test_affixes_and_structures() {
        let patterns = aggregator().aggregate(
            &labels(&[
                "fireplacesdirect.com",
                "electricfireplacesdirect.com",
                "starfiredirect.com",
                "usfireplacestore.com",
                "electricfireplacesdepot.com",
            ]),
            "fireplace",
        );

        assert_eq!(patterns.suffixes, vec!["direct"]);
        assert!(patterns.prefixes.is_empty());
        assert_eq!(patterns.industry_terms, vec!["fireplaces", "electric"]);
        assert_eq!(patterns.niche_keywords, vec!["electric", "fire"]);
        assert_eq!(
            patterns.structure_patterns,
            vec![NICHE_PLUS_BUSINESS, THREE_WORDS, MULTI_WORD]
        );
        assert_eq!(patterns.most_common_word_count, 3);
    }

    #[test]
    fn test_word_count_tie_prefers_smallest() {
        let patterns = aggregator().aggregate(
            &labels(&["bbqguys.com", "theporchswingcompany.com"]),
            "backyard",
        );
        assert_eq!(patterns.word_count_histogram.get(&2), Some(&1));
        assert_eq!(patterns.word_count_histogram.get(&4), Some(&1));
        assert_eq!(patterns.most_common_word_count, 2);
    }

    #[test]
    fn test_numbers_and_brandable() {
        let patterns = aggregator().aggregate(
            &labels(&["4seating.com", "ab.com", "cd.com"]),
            "home theater",
        );
        assert_eq!(patterns.contains_numbers_count, 1);
        assert_eq!(patterns.brand_types, vec![BRAND_BRANDABLE]);
        assert_eq!(patterns.structure_patterns, vec![SINGLE_WORD]);
    }

    #[test]
    fn test_average_within_range() {
        let sets: [&[&str]; 4] = [
            &["bbqguys.com"],
            &["pizzaovens.com", "patioandpizza.com", "thepizzaovenshop.com", "wppo.com"],
            &["dronefly.com", "advexure.com", "maverickdrone.com", "buydronesonline.com"],
            &["a.com", "abcdefghijklmnopqrstuvwxyz.com"],
        ];
        for set in sets {
            let patterns = aggregator().aggregate(&labels(set), "anything");
            assert!(patterns.length_range.min <= patterns.average_length);
            assert!(patterns.average_length <= patterns.length_range.max);
        }
    }

    #[test]
    fn test_deterministic() {
        let domains = labels(&["doversaddlery.com", "smartpakequine.com", "chicksaddlery.com", "statelinetack.com"]);
        let a = aggregator().aggregate(&domains, "horse riding");
        let b = aggregator().aggregate(&domains, "horse riding");
        assert_eq!(a, b);
        assert!(a.industry_terms.is_empty());
        assert_eq!(a.niche_keywords, vec!["saddlery", "equine", "tack"]);
    }

    #[test]
    fn test_industry_candidates_carry_counts() {
        let aggregator = aggregator();
        let tokenized = aggregator.tokenize_all(&labels(&[
            "firepitsdirect.com",
            "firepitsurplus.com",
            "theporchswingcompany.com",
        ]));
        let candidates = aggregator.industry_candidates(&tokenized);
        assert_eq!(
            candidates,
            vec![("fire".to_string(), 2), ("pits".to_string(), 2), ("firepit".to_string(), 2)]
        );
        assert_eq!(fallback_industry_terms(&candidates), vec!["firepit"]);
    }

    #[test]
    fn test_chosen_terms_free_up_common_words() {
        let aggregator = aggregator();
        let tokenized = aggregator.tokenize_all(&labels(&[
            "firepitsdirect.com",
            "firepitsurplus.com",
            "theporchswingcompany.com",
        ]));
        let seed = aggregator.keyword_seed("backyard");
        let patterns = aggregator.aggregate_with_terms(&tokenized, &seed, vec!["firepit".to_string()]);

        assert_eq!(patterns.industry_terms, vec!["firepit"]);
        assert_eq!(patterns.common_words, vec!["fire", "pits"]);
        assert_eq!(patterns.average_length, 16);
    }

    #[test]
    fn test_fallback_terms_are_long_and_capped() {
        let candidates: Vec<(String, usize)> = ["sauna", "spa", "infrared", "steam", "heaters", "wellness", "therapy"]
            .iter()
            .map(|w| (w.to_string(), 2))
            .collect();
        assert_eq!(
            fallback_industry_terms(&candidates),
            vec!["sauna", "infrared", "steam", "heaters", "wellness"]
        );
        assert!(fallback_industry_terms(&[]).is_empty());
    }

    #[test]
    fn test_spelled_out_bbq_counts_as_bbq() {
        let lexicon = Lexicon::new();
        let words: Vec<String> = ["grill", "bar", "bq"].iter().map(|s| s.to_string()).collect();
        assert_eq!(compound_terms(&words, &lexicon), vec!["bbq"]);

        let patterns = aggregator().aggregate(&labels(&["grillbarbq.com", "bbqgrill.com"]), "backyard");
        assert!(patterns.industry_terms.contains(&"bbq".to_string()));
        assert!(patterns.industry_terms.contains(&"grill".to_string()));
    }

    #[test]
    fn test_word_units_merge_compounds() {
        let lexicon = Lexicon::new();
        let words: Vec<String> = ["the", "porch", "swing", "company"].iter().map(|s| s.to_string()).collect();
        assert_eq!(word_units(&words, &lexicon), vec!["the", "porchswing", "company"]);
        assert_eq!(classify_structure(&word_units(&words, &lexicon), &lexicon), Some(THREE_WORDS));
    }
}
