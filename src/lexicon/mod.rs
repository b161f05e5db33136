//! Read-only word tables used by the tokenizer, the aggregator and the generator.
//!
//! Tables are built once per process and handed out as `Arc<Lexicon>`, so the
//! analysis types receive them explicitly instead of reaching for globals.

pub mod niches;

pub use niches::{KeywordSeed, NicheCatalog, NicheMatch};

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Curated domain vocabulary across the covered retail niches
pub const VOCABULARY: &[&str] = &[
    // Backyard & outdoor
    "fire", "pit", "pits", "bbq", "barbecue", "grill", "porch", "swing", "backyard",
    "yard", "lawn", "patio", "garden", "outdoor", "deck", "all", "things", "the",
    // Horse riding
    "horse", "equine", "saddle", "saddlery", "tack", "bridle", "riding", "equestrian",
    "stable", "ranch", "barn", "pony", "dover", "chicks", "smart", "pak", "state", "line",
    // Business words
    "direct", "supply", "depot", "mart", "store", "shop", "pro", "hub", "zone",
    "warehouse", "factory", "outlet", "gear", "world", "central", "place", "company",
    "guys", "surplus", "plus",
    // Descriptors
    "premium", "quality", "best", "top", "elite", "master", "expert", "global",
    "national", "american", "western", "english", "online", "discount", "wholesale",
    // Fireplace, sauna & wellness
    "fireplace", "fireplaces", "electric", "star", "hearth", "stove", "sauna", "saunas",
    "heater", "heaven", "northern", "secret", "recovery", "athletes", "wellness",
    // Golf, fitness & home
    "golf", "indoor", "simulator", "simulators", "home", "land", "shelf", "rain", "shine",
    "fitness", "strength", "iron", "source", "theater", "seat", "seating", "projector",
    "people", "audio", "upscale", "range", "hood", "coffee", "kitchen", "majesty",
    // Safes, solar, drones & generators
    "safe", "vault", "keeper", "liberty", "solar", "power", "kits", "green", "drone",
    "drones", "nerds", "maverick", "generator", "generators", "center", "heat", "cool",
    "pizza", "oven", "ovens", "equipment", "blissful", "almost",
];

/// Words that read as a trailing business term ("bbq" + "guys")
pub const BUSINESS_SUFFIXES: &[&str] = &[
    "direct", "company", "guys", "pro", "supply", "depot", "mart", "store", "shop",
    "hub", "zone", "outlet", "surplus",
];

/// Words that commonly open a store name
pub const DESCRIPTIVE_PREFIXES: &[&str] = &[
    "smart", "pro", "super", "best", "top", "premium", "elite", "the", "all", "my",
    "total", "pure", "prime",
];

/// Leading words that make a two-word name an "article + main word"
pub const ARTICLES: &[&str] = &["the", "all", "my"];

/// Generic business words never reported as industry or common terms
pub const STOPLIST: &[&str] = &["the", "all", "my", "get", "new", "best", "top"];

/// Endings glued onto the top niche keyword by the rule-based generator
pub const GENERIC_ENDINGS: &[&str] = &["central", "hub", "pro"];

/// Business words used for niche-only fallback suggestions
pub const BASIC_ENDINGS: &[&str] = &[
    "pro", "hub", "central", "direct", "store", "shop", "zone", "mart", "depot", "supply",
];

/// Adjacent tokens that read as a single concept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRule {
    pub head: &'static str,
    pub tails: &'static [&'static str],
    pub joined: &'static str,
}

impl CompoundRule {
    pub fn matches(&self, first: &str, second: &str) -> bool {
        first == self.head && self.tails.contains(&second)
    }
}

pub const COMPOUNDS: &[CompoundRule] = &[
    CompoundRule {
        head: "fire",
        tails: &["pit", "pits"],
        joined: "firepit",
    },
    CompoundRule {
        head: "porch",
        tails: &["swing", "swings"],
        joined: "porchswing",
    },
    CompoundRule {
        head: "bar",
        tails: &["bq"],
        joined: "bbq",
    },
];

/// Immutable set of word tables
#[derive(Debug, Clone)]
pub struct Lexicon {
    vocabulary: HashSet<String>,
    business_suffixes: HashSet<String>,
    descriptive_prefixes: HashSet<String>,
    articles: HashSet<String>,
    stoplist: HashSet<String>,
    compounds: Vec<CompoundRule>,
    longest_word: usize,
}

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Lexicon {
    /// Build the built-in tables
    pub fn new() -> Self {
        let vocabulary = to_set(VOCABULARY);
        let longest_word = vocabulary.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        Self {
            vocabulary,
            business_suffixes: to_set(BUSINESS_SUFFIXES),
            descriptive_prefixes: to_set(DESCRIPTIVE_PREFIXES),
            articles: to_set(ARTICLES),
            stoplist: to_set(STOPLIST),
            compounds: COMPOUNDS.to_vec(),
            longest_word,
        }
    }

    /// Process-wide shared copy of the built-in tables
    pub fn builtin() -> Arc<Lexicon> {
        static BUILTIN: OnceLock<Arc<Lexicon>> = OnceLock::new();
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(Lexicon::new())))
    }

    /// Add dictionary words on top of the current vocabulary
    pub fn with_vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            self.longest_word = self.longest_word.max(word.chars().count());
            self.vocabulary.insert(word);
        }
        self
    }

    pub fn is_word(&self, candidate: &str) -> bool {
        self.vocabulary.contains(candidate)
    }

    pub fn is_business_suffix(&self, word: &str) -> bool {
        self.business_suffixes.contains(word)
    }

    pub fn is_descriptive_prefix(&self, word: &str) -> bool {
        self.descriptive_prefixes.contains(word)
    }

    pub fn is_article(&self, word: &str) -> bool {
        self.articles.contains(word)
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stoplist.contains(word)
    }

    pub fn compounds(&self) -> &[CompoundRule] {
        &self.compounds
    }

    /// Length in chars of the longest dictionary word
    pub fn longest_word(&self) -> usize {
        self.longest_word
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}
