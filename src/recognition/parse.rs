use crate::domain::model::Row;
use crate::utils::error::{ExtractError, Result};
use regex::Regex;
use std::sync::OnceLock;

// The model is asked for bare JSON but sometimes wraps it in a markdown fence.
fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"^```json\s*|```\s*$").unwrap())
}

/// Turns the recognition reply text into rows. An empty reply means zero
/// rows; a single JSON object is wrapped into a one-row result; anything
/// that is not an array or object is a recognition failure. Rows without
/// any keys are dropped.
pub fn rows_from_text(text: &str) -> Result<Vec<Row>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let cleaned = fence_regex().replace_all(trimmed, "");
    let parsed: serde_json::Value =
        serde_json::from_str(cleaned.trim()).map_err(|error| ExtractError::RecognitionError {
            message: format!("response could not be parsed as JSON: {}", error),
        })?;

    let items = match parsed {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(fields) => vec![serde_json::Value::Object(fields)],
        _ => {
            return Err(ExtractError::RecognitionError {
                message: "response was not a JSON array or object".to_string(),
            })
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::Object(fields) if !fields.is_empty() => {
                Some(Row::from_fields(fields))
            }
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reply_means_zero_rows() {
        assert!(rows_from_text("").unwrap().is_empty());
        assert!(rows_from_text("   \n ").unwrap().is_empty());
    }

    #[test]
    fn strips_markdown_fence() {
        let reply = "```json\n[{\"item\": \"Coffee\"}]\n```";
        let rows = rows_from_text(reply).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].fields.get("item"),
            Some(&serde_json::json!("Coffee"))
        );
    }

    #[test]
    fn wraps_single_object_into_one_row() {
        let rows = rows_from_text("{\"merchant_name\": \"Corner Store\"}").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn scalar_reply_is_an_error() {
        assert!(rows_from_text("42").is_err());
        assert!(rows_from_text("\"just text\"").is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let error = rows_from_text("not json at all").unwrap_err();
        assert!(error.to_string().contains("parsed as JSON"));
    }

    #[test]
    fn keyless_rows_are_dropped() {
        let rows = rows_from_text("[{}, {\"a\": 1}, 7, null]").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.get("a"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn key_order_is_preserved() {
        let rows = rows_from_text("[{\"zeta\": 1, \"alpha\": 2}]").unwrap();
        let keys: Vec<&String> = rows[0].fields.keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }
}
