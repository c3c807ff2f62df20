//! Cleanup and parsing of model replies.
//!
//! The prompt asks for raw JSON but models still like to wrap it in code
//! fences. Every fence marker is removed wherever it appears before parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```json\s*").expect("fence pattern is valid"));

static BARE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```\s*").expect("fence pattern is valid"));

/// Strip code-fence markup from `text`.
pub fn sanitize(text: &str) -> String {
    let cleaned = JSON_FENCE.replace_all(text.trim(), "");
    let cleaned = BARE_FENCE.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}

/// Parse a model reply as JSON after stripping fences.
pub fn parse_model_reply(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&sanitize(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CLEAN: &str = r#"{"product":{"name":"X","brand":"Y"},"sustainableScore":62}"#;

    #[test]
    fn clean_json_parses_like_serde() {
        let expected: Value = serde_json::from_str(CLEAN).unwrap();
        assert_eq!(parse_model_reply(CLEAN).unwrap(), expected);
    }

    #[test]
    fn fenced_variants_match_unwrapped() {
        let expected: Value = serde_json::from_str(CLEAN).unwrap();
        let variants = [
            format!("```json\n{}\n```", CLEAN),
            format!("```JSON\n{}\n```", CLEAN),
            format!("```\n{}\n```", CLEAN),
            format!("\n\n   ```json{}```   \n", CLEAN),
            format!("```Json   \r\n{}\r\n```\n", CLEAN),
        ];

        for variant in &variants {
            assert_eq!(parse_model_reply(variant).unwrap(), expected, "{:?}", variant);
        }
    }

    #[test]
    fn removes_stray_fences_anywhere() {
        let text = "```json\n{\"a\": 1}\n```\n```";
        assert_eq!(parse_model_reply(text).unwrap(), json!({ "a": 1 }));
    }

    #[test]
    fn sanitize_trims_surrounding_whitespace() {
        assert_eq!(sanitize("  ```json\n[1, 2]\n```  "), "[1, 2]");
    }

    #[test]
    fn malformed_reply_is_an_error() {
        assert!(parse_model_reply("```json\n{\"product\": \n```").is_err());
        assert!(parse_model_reply("I could not identify this product.").is_err());
        assert!(parse_model_reply("").is_err());
    }
}
