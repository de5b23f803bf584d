use crate::domain::model::Row;
use crate::utils::error::Result;

/// Serializes the row set as a 2-space-indented JSON array. Key order inside
/// each row is its insertion order, not the resolved header order.
pub fn generate_json(rows: &[Row]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
