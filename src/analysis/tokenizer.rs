//! Greedy longest-match segmentation of domain labels into word tokens

use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Short alphabetic runs are accepted as tokens even when they are not words
const SHORT_RUN_MAX: usize = 3;

/// Previous tokens shorter than this absorb a stray `s`/`z`
const PLURAL_ATTACH_MAX: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Member of the curated vocabulary
    Dictionary,
    /// Anything else: short runs and single leftover characters
    Residue,
}

/// One segment of a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub text: String,
    pub kind: TokenKind,
}

impl WordToken {
    fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_dictionary(&self) -> bool {
        self.kind == TokenKind::Dictionary
    }
}

/// Label tokenizer backed by a shared [`Lexicon`]
#[derive(Debug, Clone)]
pub struct Tokenizer {
    lexicon: Arc<Lexicon>,
}

impl Tokenizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Lossless segmentation: concatenating the tokens yields `label` exactly.
    pub fn segment(&self, label: &str) -> Vec<WordToken> {
        let mut tokens: Vec<WordToken> = Vec::new();
        let mut rest = label;

        while !rest.is_empty() {
            if let Some((len, kind)) = self.longest_match(rest) {
                tokens.push(WordToken::new(&rest[..len], kind));
                rest = &rest[len..];
                continue;
            }

            let Some(ch) = rest.chars().next() else { break };
            match tokens.last_mut() {
                Some(prev) if prev.len() < PLURAL_ATTACH_MAX && matches!(ch, 's' | 'z') => {
                    prev.text.push(ch);
                }
                _ => tokens.push(WordToken::new(ch.to_string(), TokenKind::Residue)),
            }
            rest = &rest[ch.len_utf8()..];
        }

        tokens
    }

    /// Word tokens for analysis: single characters other than `s`/`z` are dropped.
    pub fn tokenize(&self, label: &str) -> Vec<WordToken> {
        self.segment(label)
            .into_iter()
            .filter(|t| !t.is_empty() && (t.len() > 1 || matches!(t.as_str(), "s" | "z")))
            .collect()
    }

    /// Token texts only
    pub fn words(&self, label: &str) -> Vec<String> {
        self.tokenize(label).into_iter().map(|t| t.text).collect()
    }

    /// Longest accepted prefix of `rest`, as a byte length
    fn longest_match(&self, rest: &str) -> Option<(usize, TokenKind)> {
        let ends: Vec<usize> = rest
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take(self.lexicon.longest_word().max(SHORT_RUN_MAX))
            .collect();

        for (count, &end) in ends.iter().enumerate().rev() {
            let prefix = &rest[..end];
            if self.lexicon.is_word(prefix) {
                return Some((end, TokenKind::Dictionary));
            }
            if count < SHORT_RUN_MAX && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return Some((end, TokenKind::Residue));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(Lexicon::builtin())
    }

    fn texts(tokens: &[WordToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_dictionary_segmentation() {
        let t = tokenizer();
        assert_eq!(t.words("firepitsdirect"), vec!["fire", "pits", "direct"]);
        assert_eq!(t.words("theporchswingcompany"), vec!["the", "porch", "swing", "company"]);
        assert_eq!(t.words("allthingsbarbecue"), vec!["all", "things", "barbecue"]);
        assert_eq!(t.words("bbqguys"), vec!["bbq", "guys"]);
        assert_eq!(t.words("doversaddlery"), vec!["dover", "saddlery"]);
    }

    #[test]
    fn test_token_kinds() {
        let tokens = tokenizer().tokenize("statelinetack");
        assert!(tokens.iter().all(WordToken::is_dictionary));

        let tokens = tokenizer().tokenize("finnleo");
        assert_eq!(texts(&tokens), vec!["fin", "nle"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Residue));
    }

    #[test]
    fn test_segment_is_lossless() {
        let t = tokenizer();
        for label in [
            "firepitsdirect",
            "4seating",
            "mrsolar",
            "ajmadison",
            "horseloverz",
            "123",
            "fire-pit",
            "x",
            "",
        ] {
            let joined: String = t.segment(label).iter().map(|w| w.text.as_str()).collect();
            assert_eq!(joined, label);
        }
    }

    #[test]
    fn test_tokenize_round_trips_plain_words() {
        let t = tokenizer();
        for label in ["firepitsdirect", "theporchswingcompany", "bbqguys", "saunaplace"] {
            assert_eq!(t.words(label).concat(), label);
        }
    }

    #[test]
    fn test_empty_and_digits() {
        let t = tokenizer();
        assert!(t.segment("").is_empty());
        assert!(t.tokenize("").is_empty());

        let digits = t.segment("123");
        assert_eq!(texts(&digits), vec!["1", "2", "3"]);
        assert!(digits.iter().all(|d| d.kind == TokenKind::Residue));
        assert!(t.tokenize("123").is_empty());
    }

    #[test]
    fn test_single_letters_filtered_except_s_and_z() {
        let t = tokenizer();
        // "4" is dropped from the analysis view but kept by segment
        assert_eq!(t.words("4seating"), vec!["seating"]);
        assert_eq!(texts(&t.segment("4seating")), vec!["4", "seating"]);
        // trailing "r" after "mrs" + "ola" is dropped
        assert_eq!(t.words("mrsolar"), vec!["mrs", "ola"]);
    }

    #[test]
    fn test_stray_plural_letter_survives_tokenize() {
        let t = tokenizer();
        // "grill" is too long to absorb the trailing letter
        assert_eq!(texts(&t.segment("grills")), vec!["grill", "s"]);
        assert_eq!(t.words("grills"), vec!["grill", "s"]);
        assert_eq!(t.words("grillz"), vec!["grill", "z"]);

        assert_eq!(texts(&t.segment("grillx")), vec!["grill", "x"]);
        assert_eq!(t.words("grillx"), vec!["grill"]);
    }
}
