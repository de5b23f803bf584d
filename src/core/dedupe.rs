use crate::domain::model::{Row, SOURCE_FILE_FIELD};
use std::collections::HashSet;

/// Drops rows that are structural duplicates of an earlier row once the
/// `source_file` tag is ignored. First occurrence wins; surviving rows keep
/// their relative order, so rows from earlier files shadow later copies.
pub fn dedupe_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());

    for row in rows {
        if seen.insert(canonical_key(&row)) {
            unique.push(row);
        }
    }

    unique
}

// Key order matters: two rows with the same pairs in a different order are
// distinct. Under preserve_order, Map removal swaps entries around, so the
// filtered copy is built by iteration instead.
fn canonical_key(row: &Row) -> String {
    let mut filtered = serde_json::Map::with_capacity(row.fields.len());
    for (key, value) in &row.fields {
        if key != SOURCE_FILE_FIELD {
            filtered.insert(key.clone(), value.clone());
        }
    }
    serde_json::Value::Object(filtered).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Row;

    fn tagged_row(source: &str, pairs: &[(&str, serde_json::Value)]) -> Row {
        let mut fields = serde_json::Map::new();
        for (key, value) in pairs {
            fields.insert(key.to_string(), value.clone());
        }
        Row::with_source(source, fields)
    }

    #[test]
    fn keeps_first_copy_across_files() {
        let rows = vec![
            tagged_row("a.png", &[("item", serde_json::json!("Coffee"))]),
            tagged_row("b.png", &[("item", serde_json::json!("Coffee"))]),
            tagged_row("b.png", &[("item", serde_json::json!("Tea"))]),
        ];

        let unique = dedupe_rows(rows);

        assert_eq!(unique.len(), 2);
        assert_eq!(
            unique[0].fields.get("source_file"),
            Some(&serde_json::json!("a.png"))
        );
        assert_eq!(
            unique[1].fields.get("item"),
            Some(&serde_json::json!("Tea"))
        );
    }

    #[test]
    fn key_order_distinguishes_rows() {
        let mut forward = serde_json::Map::new();
        forward.insert("a".to_string(), serde_json::json!(1));
        forward.insert("b".to_string(), serde_json::json!(2));

        let mut reversed = serde_json::Map::new();
        reversed.insert("b".to_string(), serde_json::json!(2));
        reversed.insert("a".to_string(), serde_json::json!(1));

        let rows = vec![Row::from_fields(forward), Row::from_fields(reversed)];

        assert_eq!(dedupe_rows(rows).len(), 2);
    }

    #[test]
    fn idempotent() {
        let rows = vec![
            tagged_row("a.png", &[("item", serde_json::json!("Coffee"))]),
            tagged_row("b.png", &[("item", serde_json::json!("Coffee"))]),
        ];

        let once = dedupe_rows(rows);
        let twice = dedupe_rows(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn nested_values_compared_structurally() {
        let items = serde_json::json!([{"description": "Milk", "price": "3.50"}]);
        let rows = vec![
            tagged_row("a.png", &[("items", items.clone())]),
            tagged_row("b.png", &[("items", items)]),
        ];

        assert_eq!(dedupe_rows(rows).len(), 1);
    }
}
