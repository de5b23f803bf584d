use crate::domain::model::Row;
use crate::domain::ports::SpreadsheetEncoder;
use crate::export::cell_text;
use crate::utils::error::Result;

/// Flattens rows into a text grid in header order and hands it to the
/// encoder. Cell rendering matches the CSV export, so the same row produces
/// the same visible text in both artifacts.
pub fn spreadsheet_bytes(
    rows: &[Row],
    headers: &[String],
    encoder: &dyn SpreadsheetEncoder,
) -> Result<Vec<u8>> {
    let grid: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| cell_text(row.fields.get(header)))
                .collect()
        })
        .collect();
    encoder.encode(headers, &grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TabEncoder;

    impl SpreadsheetEncoder for TabEncoder {
        fn encode(&self, headers: &[String], grid: &[Vec<String>]) -> Result<Vec<u8>> {
            let mut lines = vec![headers.join("\t")];
            lines.extend(grid.iter().map(|cells| cells.join("\t")));
            Ok(lines.join("\n").into_bytes())
        }
    }

    #[test]
    fn grid_follows_header_order_with_empty_cells_for_missing_keys() {
        let mut fields = serde_json::Map::new();
        fields.insert("total".to_string(), serde_json::json!(12.5));
        let rows = vec![Row::with_source("a.png", fields)];
        let headers = vec![
            "source_file".to_string(),
            "total".to_string(),
            "vendor".to_string(),
        ];

        let bytes = spreadsheet_bytes(&rows, &headers, &TabEncoder).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "source_file\ttotal\tvendor\na.png\t12.5\t");
    }
}
