//! Instruction builders for each collaborator call site

use crate::types::DomainPatterns;

fn join_or_none(words: &[String]) -> String {
    if words.is_empty() {
        "none".to_string()
    } else {
        words.join(", ")
    }
}

/// Candidate suggestions shaped by the competitor patterns
pub fn suggestions(
    niche: &str,
    patterns: &DomainPatterns,
    excluded: &[String],
    count: usize,
    min_length: usize,
    max_length: usize,
    suffix: &str,
) -> String {
    format!(
        "Generate exactly {count} unique, creative domain names for a {niche} business based on these patterns:

Niche Keywords: {keywords}
Industry Terms: {terms}
Common Suffixes: {suffixes}
Common Prefixes: {prefixes}

Requirements:
- Generate exactly {count} unique domain names
- Use .{suffix} extension
- Combine niche keywords, industry terms, prefixes, and suffixes creatively
- Use 2 or 3 real, meaningful words per name
- Avoid using the same keyword multiple times
- Make them brandable, memorable, descriptive and clear
- Ensure they're relevant to the {niche} industry
- Don't include numbers or hyphens
- Keep domains between {min_length}-{max_length} characters (excluding .{suffix})
- lowercase the domain names

Exclude these domains: {excluded}

Return ONLY a JSON array of domain names, no code fences, no markdown, no explanations or additional text:
[\"domain1.{suffix}\", \"domain2.{suffix}\", ...]",
        keywords = join_or_none(&patterns.niche_keywords),
        terms = join_or_none(&patterns.industry_terms),
        suffixes = join_or_none(&patterns.suffixes),
        prefixes = join_or_none(&patterns.prefixes),
        excluded = join_or_none(excluded),
    )
}

/// Competitor-style names for a niche that has no catalog entry
pub fn competitors(niche: &str, keywords: &[String], count: usize) -> String {
    format!(
        "You are a domain naming assistant.
Your task is to generate exactly {count} unique domain name ideas:

Niche: {niche}
Relevant Keywords: {keywords}

Task:
- Generate {count} unique, descriptive, 2 or 3 word domain names.
- Each domain name must use words related to the given niche and keywords.
- Use only real, meaningful words (no made-up nonsense).
- Must be easy to pronounce, brandable, and memorable.
- Do not use marketplaces such as amazon, ebay or walmart.

Return ONLY a JSON array of domain names with .com extension, no code fences, no markdown, no explanations or additional text:
[\"domain1.com\", \"domain2.com\", ...]",
        keywords = join_or_none(keywords),
    )
}

/// Keyword list for a niche
pub fn keywords(niche: &str) -> String {
    format!(
        "List 10 to 15 single lowercase words that shoppers and store owners associate with the \"{niche}\" niche.
Use real English words only, no phrases, no brand names.

Return ONLY a JSON array of strings, no code fences, no markdown, no explanations:
[\"word1\", \"word2\", ...]"
    )
}

/// Industry vocabulary picked from recurring competitor words
pub fn industry_terms(niche: &str, candidates: &[(String, usize)]) -> String {
    let listed: Vec<String> = candidates
        .iter()
        .map(|(word, count)| format!("{word} (appears {count} times)"))
        .collect();
    format!(
        "Filter the word fragments below, extracted from competitor domains in the \"{niche}\" niche.

Rules:
- Exclude random letter combinations, partial words and meaningless fragments (like \"aun\", \"ste\", \"ter\")
- Include real English words relevant to the {niche} industry
- Include industry-specific terms and product names
- Include common business terms only if they make sense for this niche
- Only return words from the list, unchanged

Candidate words:
{words}

Return ONLY a JSON array of the valid industry terms, no code fences, no markdown, no explanations:
[\"term1\", \"term2\", ...]",
        words = listed.join("\n"),
    )
}

/// Word segmentation of a single label
pub fn segmentation(label: &str) -> String {
    format!(
        "Split the domain label \"{label}\" into the words it is made of, in order.
Every character must appear in exactly one word; do not add, drop or change characters.

Return ONLY a JSON array of lowercase strings, no code fences, no markdown, no explanations:
[\"word1\", \"word2\"]"
    )
}

/// 1-100 quality rating of one candidate
pub fn score(domain: &str, niche: &str, patterns: &DomainPatterns) -> String {
    format!(
        "Rate the quality of this domain name \"{domain}\" for a {niche} business on a scale of 1-100.

Consider these factors:
- Relevance to {niche} industry
- Memorability and brandability
- Length (7-20 characters is optimal)
- Clarity and descriptiveness
- Potential for SEO
- Professional appearance
- Ease of spelling and pronunciation

Context from competitor analysis:
- Niche Keywords: {keywords}
- Industry Terms: {terms}
- Common Patterns: {structures}

Return ONLY a number between 1-100, no explanations or additional text.",
        keywords = join_or_none(&patterns.niche_keywords),
        terms = join_or_none(&patterns.industry_terms),
        structures = join_or_none(&patterns.structure_patterns),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_prompt_carries_constraints() {
        let patterns = DomainPatterns {
            niche_keywords: vec!["fire".into(), "porch".into()],
            ..Default::default()
        };
        let prompt = suggestions(
            "backyard",
            &patterns,
            &["firepitsdirect.com".to_string()],
            15,
            14,
            20,
            "com",
        );
        assert!(prompt.contains("exactly 15"));
        assert!(prompt.contains("Niche Keywords: fire, porch"));
        assert!(prompt.contains("Industry Terms: none"));
        assert!(prompt.contains("between 14-20 characters"));
        assert!(prompt.contains("Exclude these domains: firepitsdirect.com"));
    }

    #[test]
    fn test_small_prompts_mention_subject() {
        assert!(segmentation("bbqguys").contains("\"bbqguys\""));
        let terms = industry_terms("sauna", &[("infrared".to_string(), 3), ("aun".to_string(), 2)]);
        assert!(terms.contains("infrared (appears 3 times)\naun (appears 2 times)"));
        assert!(terms.contains("\"sauna\" niche"));
        assert!(keywords("aquarium").contains("\"aquarium\""));
        assert!(competitors("aquarium", &[], 20).contains("exactly 20"));
        assert!(score("porchcentral.com", "backyard", &DomainPatterns::default()).contains("porchcentral.com"));
    }
}
