use crate::domain::model::{Row, SOURCE_FILE_FIELD};
use std::collections::BTreeSet;

/// Resolves the export column order for a row set: `source_file` first, then
/// every other key seen across the rows, lexicographically sorted. The result
/// does not depend on row order.
pub fn resolve_headers(rows: &[Row]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for row in rows {
        for key in row.fields.keys() {
            if key != SOURCE_FILE_FIELD {
                keys.insert(key.clone());
            }
        }
    }

    let mut headers = Vec::with_capacity(keys.len() + 1);
    headers.push(SOURCE_FILE_FIELD.to_string());
    headers.extend(keys);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let mut fields = serde_json::Map::new();
        for (key, value) in pairs {
            fields.insert(key.to_string(), serde_json::json!(value));
        }
        Row::from_fields(fields)
    }

    #[test]
    fn source_file_first_then_sorted_unique() {
        let rows = vec![
            row(&[("source_file", "b.png"), ("zeta", "1"), ("alpha", "2")]),
            row(&[("source_file", "a.png"), ("beta", "3"), ("alpha", "4")]),
        ];

        assert_eq!(
            resolve_headers(&rows),
            vec!["source_file", "alpha", "beta", "zeta"]
        );
    }

    #[test]
    fn independent_of_row_order() {
        let forward = vec![row(&[("a", "1")]), row(&[("b", "2")])];
        let reversed = vec![row(&[("b", "2")]), row(&[("a", "1")])];

        assert_eq!(resolve_headers(&forward), resolve_headers(&reversed));
    }

    #[test]
    fn empty_rows_yield_source_file_alone() {
        assert_eq!(resolve_headers(&[]), vec!["source_file"]);
        assert_eq!(resolve_headers(&[Row::new()]), vec!["source_file"]);
    }
}
