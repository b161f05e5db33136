//! Domain label normalization and candidate validation

use crate::error::Result;
use crate::validation_error;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn letters_only() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]+$").expect("static regex"))
}

fn has_digit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d").expect("static regex"))
}

/// True when the string contains at least one ASCII digit
pub fn contains_digit(text: &str) -> bool {
    has_digit().is_match(text)
}

/// Lowercase domain name with scheme, `www.` and every suffix after the
/// first dot removed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainLabel(String);

impl DomainLabel {
    /// Derive a label from raw input such as `https://www.FirePitsDirect.com/`
    pub fn parse(raw: &str) -> Self {
        let mut rest = raw.trim().to_lowercase();
        for scheme in ["https://", "http://"] {
            if let Some(stripped) = rest.strip_prefix(scheme) {
                rest = stripped.to_string();
            }
        }
        if let Some(stripped) = rest.strip_prefix("www.") {
            rest = stripped.to_string();
        }
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let label = host.split('.').next().unwrap_or_default();
        Self(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_digit(&self) -> bool {
        contains_digit(&self.0)
    }

    /// Label plus `.suffix`
    pub fn with_suffix(&self, suffix: &str) -> String {
        format!("{}.{}", self.0, suffix.trim_start_matches('.'))
    }
}

impl std::fmt::Display for DomainLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validator for generated candidate labels
#[derive(Debug, Clone)]
pub struct DomainValidator {
    min_length: usize,
    max_length: usize,
}

impl DomainValidator {
    pub fn new(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length,
        }
    }

    /// Accept only `min..=max` lowercase ASCII letters
    pub fn validate(&self, label: &DomainLabel) -> Result<()> {
        let len = label.len();
        if len < self.min_length {
            return Err(validation_error!(
                "label '{}' is shorter than {} characters",
                label,
                self.min_length
            ));
        }
        if len > self.max_length {
            return Err(validation_error!(
                "label '{}' is longer than {} characters",
                label,
                self.max_length
            ));
        }
        if !letters_only().is_match(label.as_str()) {
            return Err(validation_error!("label '{}' must contain only letters a-z", label));
        }
        Ok(())
    }

    pub fn is_valid(&self, label: &DomainLabel) -> bool {
        self.validate(label).is_ok()
    }
}

impl Default for DomainValidator {
    fn default() -> Self {
        Self::new(3, 20)
    }
}
