//! Defensive extraction of structured values from free-form model output

use crate::fallback::{FallbackReason, Resolution};
use serde_json::Value;

/// Drop a surrounding markdown code fence, if any
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // skip an info string such as ```json
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse a JSON array of strings out of `text`.
///
/// Leading or trailing prose is tolerated: the outermost `[` ... `]` span is
/// parsed. Non-string elements are a schema mismatch, blank strings are
/// dropped and an array with nothing left is [`FallbackReason::Empty`].
pub fn parse_string_array(text: &str) -> Resolution<Vec<String>> {
    let body = strip_fences(text);
    let (Some(start), Some(end)) = (body.find('['), body.rfind(']')) else {
        return Resolution::fallback(FallbackReason::Malformed("no JSON array in response".to_string()));
    };
    if end < start {
        return Resolution::fallback(FallbackReason::Malformed("unbalanced brackets".to_string()));
    }

    let value: Value = match serde_json::from_str(&body[start..=end]) {
        Ok(value) => value,
        Err(e) => return Resolution::fallback(FallbackReason::Malformed(e.to_string())),
    };

    let Value::Array(items) = value else {
        return Resolution::fallback(FallbackReason::SchemaMismatch("expected an array".to_string()));
    };

    let mut strings = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    strings.push(s.to_string());
                }
            }
            other => {
                return Resolution::fallback(FallbackReason::SchemaMismatch(format!(
                    "expected string elements, found {}",
                    other
                )))
            }
        }
    }

    if strings.is_empty() {
        return Resolution::fallback(FallbackReason::Empty);
    }
    Resolution::Ok(strings)
}

/// Parse a 1..=100 score from the leading digits of `text`
pub fn parse_score(text: &str) -> Resolution<u8> {
    let trimmed = strip_fences(text);
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Resolution::fallback(FallbackReason::Malformed(format!(
            "no leading number in {:?}",
            trimmed.chars().take(40).collect::<String>()
        )));
    }

    match digits.parse::<u32>() {
        Ok(score @ 1..=100) => Resolution::Ok(score as u8),
        Ok(score) => Resolution::fallback(FallbackReason::OutOfRange(score.to_string())),
        Err(_) => Resolution::fallback(FallbackReason::OutOfRange(digits)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_array() {
        let parsed = parse_string_array(r#"["porchcentral.com", " yardhub.com "]"#);
        assert_eq!(parsed.ok(), Some(vec!["porchcentral.com".to_string(), "yardhub.com".to_string()]));
    }

    #[test]
    fn test_fenced_array_with_prose() {
        let text = "```json\nHere you go: [\"fire\", \"pits\"]\n```";
        assert_eq!(parse_string_array(text).ok(), Some(vec!["fire".to_string(), "pits".to_string()]));
    }

    #[test]
    fn test_array_failures() {
        assert!(matches!(
            parse_string_array("not json").reason(),
            Some(FallbackReason::Malformed(_))
        ));
        assert!(matches!(
            parse_string_array("[1, 2, 3]").reason(),
            Some(FallbackReason::SchemaMismatch(_))
        ));
        assert_eq!(parse_string_array("[]").reason(), Some(&FallbackReason::Empty));
        assert_eq!(parse_string_array(r#"["", "  "]"#).reason(), Some(&FallbackReason::Empty));
        assert!(matches!(
            parse_string_array("] oops [").reason(),
            Some(FallbackReason::Malformed(_))
        ));
    }

    #[test]
    fn test_scores() {
        assert_eq!(parse_score("85").ok(), Some(85));
        assert_eq!(parse_score(" 72\n").ok(), Some(72));
        assert_eq!(parse_score("100 - excellent").ok(), Some(100));
        assert!(matches!(parse_score("0").reason(), Some(FallbackReason::OutOfRange(_))));
        assert!(matches!(parse_score("250").reason(), Some(FallbackReason::OutOfRange(_))));
        assert!(matches!(parse_score("Score: 80").reason(), Some(FallbackReason::Malformed(_))));
        assert!(matches!(
            parse_score("99999999999999999999").reason(),
            Some(FallbackReason::OutOfRange(_))
        ));
    }
}
