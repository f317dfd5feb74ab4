//! Extraction strategies that locate JSON object candidates in arbitrary text.
//!
//! Two strategies implement [`ExtractStrategy`] and are tried in a fixed
//! fallback order by [`extract_objects`]: the pattern extractor first, then
//! the line-oriented brace counter. Each returns `None` when it finds no
//! valid object at all, which is distinct from a valid document with zero
//! servers.

use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Whether a text span parses as syntactically valid JSON and is an object.
///
/// Used as a filter; internal parse failures become `false`, never errors.
pub fn is_valid_object(text: &str) -> bool {
    serde_json::from_str::<Value>(text).map(|v| v.is_object()).unwrap_or(false)
}

/// A strategy that scans raw text for balanced JSON object spans.
pub trait ExtractStrategy {
    /// Validated parsed objects in the order they appear in the text, or
    /// `None` when no valid object was found.
    fn extract(&self, text: &str) -> Option<Vec<Value>>;
}

/// Nested-brace pattern matcher, tried first.
///
/// The pattern matches balanced braces up to three nesting levels; deeper
/// documents fall through to [`BraceExtractor`]. Line comments (`// ...`)
/// are stripped from each match before validation.
pub struct PatternExtractor {
    object_regex: Regex,
    comment_regex: Regex,
}

impl PatternExtractor {
    /// Build the extractor, compiling its matching patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        // Balanced braces, three levels deep
        let object_regex = Regex::new(r"\{(?:[^{}]|(?:\{(?:[^{}]|(?:\{[^{}]*\}))*\}))*\}")?;
        let comment_regex = Regex::new(r"(?m)//.*$")?;

        Ok(Self { object_regex, comment_regex })
    }
}

impl ExtractStrategy for PatternExtractor {
    fn extract(&self, text: &str) -> Option<Vec<Value>> {
        let mut objects = Vec::new();

        for candidate in self.object_regex.find_iter(text) {
            let cleaned = self.comment_regex.replace_all(candidate.as_str(), "");
            let cleaned = cleaned.trim();

            if is_valid_object(cleaned) {
                match serde_json::from_str(cleaned) {
                    Ok(value) => objects.push(value),
                    Err(e) => debug!("Rejected candidate after validation: {e}"),
                }
            } else {
                debug!("Dropping invalid candidate span ({} bytes)", cleaned.len());
            }
        }

        debug!("Pattern extraction found {} valid object(s)", objects.len());

        if objects.is_empty() {
            None
        } else {
            Some(objects)
        }
    }
}

/// Line-oriented running brace-count fallback.
///
/// Tolerates arbitrarily deep nesting and multiple objects per line boundary,
/// but is blind to braces inside string literals and comments - an accepted
/// approximation for the degraded inputs it exists to handle.
#[derive(Debug, Default)]
pub struct BraceExtractor;

impl BraceExtractor {
    pub const fn new() -> Self {
        Self
    }
}

impl ExtractStrategy for BraceExtractor {
    fn extract(&self, text: &str) -> Option<Vec<Value>> {
        let mut objects = Vec::new();
        let mut current_block = String::new();
        let mut open_braces: i64 = 0;

        for line in text.lines() {
            let open_count = line.matches('{').count() as i64;
            let close_count = line.matches('}').count() as i64;

            open_braces += open_count - close_count;
            current_block.push_str(line);
            current_block.push('\n');

            if open_braces == 0 && !current_block.trim().is_empty() {
                let block = current_block.trim();
                if is_valid_object(block) {
                    if let Ok(value) = serde_json::from_str(block) {
                        objects.push(value);
                    }
                } else {
                    debug!("Dropping unbalanced or invalid block ({} bytes)", block.len());
                }
                current_block.clear();
            }
        }

        debug!("Brace extraction found {} valid object(s)", objects.len());

        if objects.is_empty() {
            None
        } else {
            Some(objects)
        }
    }
}

/// Run the extraction strategies in their fixed fallback order and return the
/// first non-empty candidate list.
pub fn extract_objects(text: &str) -> Option<Vec<Value>> {
    if let Ok(pattern) = PatternExtractor::new() {
        if let Some(objects) = pattern.extract(text) {
            return Some(objects);
        }
    }

    BraceExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SINGLE: &str = r#"{
  "servers": {
    "fetch": {
      "command": "npx",
      "args": ["-y", "fetch-server"]
    }
  }
}"#;

    #[test]
    fn test_is_valid_object() {
        assert!(is_valid_object("{}"));
        assert!(is_valid_object(r#"{"a": {"b": []}}"#));
        assert!(!is_valid_object("{"));
        assert!(!is_valid_object("[1, 2]"));
        assert!(!is_valid_object("\"string\""));
        assert!(!is_valid_object("not json"));
    }

    #[test]
    fn test_pattern_round_trip_single_object() {
        let extractor = PatternExtractor::new().expect("pattern should compile");
        let objects = extractor.extract(SINGLE).expect("should find the object");

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0], serde_json::from_str::<Value>(SINGLE).expect("valid JSON"));
    }

    #[test]
    fn test_brace_round_trip_single_object() {
        let objects = BraceExtractor::new().extract(SINGLE).expect("should find the object");

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0], serde_json::from_str::<Value>(SINGLE).expect("valid JSON"));
    }

    #[test]
    fn test_pattern_strips_line_comments() {
        let text = "{\n  // the default fetcher\n  \"servers\": {}\n}";
        let extractor = PatternExtractor::new().expect("pattern should compile");

        let objects = extractor.extract(text).expect("should find the object");
        assert_eq!(objects, vec![json!({"servers": {}})]);
    }

    #[test]
    fn test_two_objects_with_prose_between() {
        let text = format!("{SINGLE}\n\nsome prose the user left behind\n\n{}", r#"{"servers": {"db": {"command": "db-server"}}}"#);

        let pattern = PatternExtractor::new().expect("pattern should compile");
        let from_pattern = pattern.extract(&text).expect("pattern should find objects");
        assert_eq!(from_pattern.len(), 2);

        let from_braces = BraceExtractor::new().extract(&text).expect("braces should find objects");
        assert_eq!(from_braces.len(), 2);
        assert_eq!(from_pattern, from_braces);
    }

    #[test]
    fn test_no_candidates_is_none() {
        let pattern = PatternExtractor::new().expect("pattern should compile");
        assert!(pattern.extract("nothing here").is_none());
        assert!(BraceExtractor::new().extract("nothing here").is_none());
        assert!(extract_objects("nothing here").is_none());
    }

    #[test]
    fn test_empty_document_with_zero_servers_still_extracts() {
        // "no result" must stay distinct from "zero servers"
        let objects = extract_objects(r#"{"servers": {}}"#).expect("should find one object");
        assert_eq!(objects, vec![json!({"servers": {}})]);
    }

    #[test]
    fn test_brace_extractor_handles_arbitrary_depth() {
        let text = "{\n\"a\": {\n\"b\": {\n\"c\": {\n\"d\": 1\n}\n}\n}\n}";

        let objects = BraceExtractor::new().extract(text).expect("should find the object");
        assert_eq!(objects, vec![json!({"a": {"b": {"c": {"d": 1}}}})]);
    }

    #[test]
    fn test_string_braces_fall_back_to_brace_counting() {
        // Brace characters inside string values push the structural depth past
        // the pattern's reach; the line counter still balances them.
        let text = "{\n\"a\": \"{\",\n\"b\": \"{\",\n\"c\": \"{\",\n\"d\": \"}\",\n\"e\": \"}\",\n\"f\": \"}\"\n}";

        let pattern = PatternExtractor::new().expect("pattern should compile");
        assert!(pattern.extract(text).is_none());

        let objects = extract_objects(text).expect("fallback should find the object");
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].get("a"), Some(&json!("{")));
    }

    #[test]
    fn test_brace_extractor_multiple_blocks() {
        let text = "{\n\"a\": 1\n}\n{\n\"b\": 2\n}";
        let objects = BraceExtractor::new().extract(text).expect("should find two blocks");
        assert_eq!(objects, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_invalid_blocks_dropped_silently() {
        let text = "{\n\"a\": oops\n}\n{\n\"b\": 2\n}";
        let objects = BraceExtractor::new().extract(text).expect("valid block remains");
        assert_eq!(objects, vec![json!({"b": 2})]);
    }

    #[test]
    fn test_extraction_order_matches_text_order() {
        let text = "{\"first\": 1}\n\n{\"second\": 2}\n\n{\"third\": 3}";
        let objects = extract_objects(text).expect("should find three objects");
        assert_eq!(
            objects,
            vec![json!({"first": 1}), json!({"second": 2}), json!({"third": 3})]
        );
    }
}
