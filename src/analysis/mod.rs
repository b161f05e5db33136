//! Lexical analysis of competitor domain names

pub mod advice;
pub mod patterns;
pub mod tokenizer;

pub use advice::advise;
pub use patterns::{
    classify_structure, fallback_industry_terms, word_units, PatternAggregator, TokenizedDomain,
};
pub use tokenizer::{TokenKind, Tokenizer, WordToken};
