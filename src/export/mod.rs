pub mod bundle;
pub mod csv;
pub mod json;
pub mod sheet;
pub mod sql;

use serde_json::Value;

// Shared cell rendering for the tabular exports (CSV and spreadsheet).
// Nested values fall back to compact JSON.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    }
}
