//! Naming guidance rendered from a pattern summary

use crate::types::DomainPatterns;

/// Plain-language advice for someone naming a store in this niche.
///
/// Each line is emitted only when the underlying signal exists, so an empty
/// summary produces just the "avoid numbers" hint.
pub fn advise(patterns: &DomainPatterns) -> Vec<String> {
    let mut advice = Vec::new();

    if patterns.average_length > 0 {
        advice.push(format!(
            "Keep domain length between {}-{} characters (average: {})",
            patterns.length_range.min, patterns.length_range.max, patterns.average_length
        ));
    }

    match patterns.most_common_word_count {
        0 => {}
        1 => advice.push("Most successful stores use single-word domains".to_string()),
        n => advice.push(format!("Most successful stores use {n}-word domains")),
    }

    if !patterns.industry_terms.is_empty() {
        advice.push(format!(
            "Consider industry-specific terms: {}",
            head(&patterns.industry_terms, 3)
        ));
    }

    if !patterns.common_words.is_empty() {
        advice.push(format!(
            "Other frequently used words: {}",
            head(&patterns.common_words, 3)
        ));
    }

    if let Some(structure) = patterns.structure_patterns.first() {
        advice.push(format!("Popular structure: {structure}"));
    }

    if !patterns.brand_types.is_empty() {
        advice.push(format!(
            "Brand styles: {} names work well",
            patterns.brand_types.join(" and ")
        ));
    }

    if patterns.contains_numbers_count == 0 {
        advice.push("Avoid using numbers in your domain".to_string());
    }

    advice
}

fn head(words: &[String], n: usize) -> String {
    words.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}
