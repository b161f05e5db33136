//! Local, deterministic name combinations

use crate::lexicon::{BASIC_ENDINGS, GENERIC_ENDINGS};
use crate::types::DomainPatterns;

/// Upper bound on combinations from [`rule_based`]
pub const RULE_BASED_CAP: usize = 10;

/// Upper bound on combinations from [`basic_suggestions`]
pub const BASIC_CAP: usize = 20;

/// Pattern-driven combinations, bare labels in a fixed order:
/// keyword+suffix, term+suffix, prefix+keyword, then the generic endings
/// on the first keyword.
pub fn rule_based(patterns: &DomainPatterns) -> Vec<String> {
    let keywords = &patterns.niche_keywords[..patterns.niche_keywords.len().min(3)];
    let terms = &patterns.industry_terms[..patterns.industry_terms.len().min(3)];
    let suffixes = &patterns.suffixes[..patterns.suffixes.len().min(2)];
    let prefixes = &patterns.prefixes[..patterns.prefixes.len().min(2)];

    let mut labels = Vec::new();
    for keyword in keywords {
        labels.extend(suffixes.iter().map(|suffix| format!("{keyword}{suffix}")));
    }
    for term in terms {
        labels.extend(suffixes.iter().map(|suffix| format!("{term}{suffix}")));
    }
    for prefix in prefixes {
        labels.extend(keywords.iter().map(|keyword| format!("{prefix}{keyword}")));
    }
    if let Some(first) = keywords.first() {
        labels.extend(GENERIC_ENDINGS.iter().map(|ending| format!("{first}{ending}")));
    }

    labels.truncate(RULE_BASED_CAP);
    labels
}

/// Niche-only combinations for when patterns carry nothing usable
pub fn basic_suggestions(niche: &str) -> Vec<String> {
    let words: Vec<String> = niche
        .split_whitespace()
        .map(|w| w.chars().filter(char::is_ascii_alphabetic).collect::<String>().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Vec::new();
    }

    let squashed = words.concat();
    let mut labels: Vec<String> = BASIC_ENDINGS
        .iter()
        .map(|ending| format!("{squashed}{ending}"))
        .collect();

    if words.len() > 1 {
        for word in &words {
            labels.extend(BASIC_ENDINGS.iter().take(5).map(|ending| format!("{word}{ending}")));
        }
    }

    let mut seen = std::collections::HashSet::new();
    labels.retain(|label| seen.insert(label.clone()));
    labels.truncate(BASIC_CAP);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> DomainPatterns {
        DomainPatterns {
            niche_keywords: vec!["fire".into(), "porch".into(), "grill".into(), "deck".into()],
            industry_terms: vec!["pits".into()],
            suffixes: vec!["direct".into(), "depot".into(), "shop".into()],
            prefixes: vec!["the".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_rule_based_order_and_cap() {
        let labels = rule_based(&patterns());
        assert_eq!(labels.len(), RULE_BASED_CAP);
        assert_eq!(
            &labels[..8],
            &[
                "firedirect", "firedepot", "porchdirect", "porchdepot", "grilldirect",
                "grilldepot", "pitsdirect", "pitsdepot",
            ]
        );
        assert_eq!(&labels[8..], &["thefire", "theporch"]);
    }

    #[test]
    fn test_rule_based_without_suffixes_uses_generic_endings() {
        let patterns = DomainPatterns {
            niche_keywords: vec!["porch".into()],
            ..Default::default()
        };
        assert_eq!(rule_based(&patterns), vec!["porchcentral", "porchhub", "porchpro"]);
        assert!(rule_based(&DomainPatterns::default()).is_empty());
    }

    #[test]
    fn test_basic_suggestions() {
        let labels = basic_suggestions("Aquarium Supplies");
        assert_eq!(labels[0], "aquariumsuppliespro");
        assert!(labels.contains(&"aquariumhub".to_string()));
        assert!(labels.len() <= BASIC_CAP);
        assert!(basic_suggestions("  ").is_empty());
    }
}
