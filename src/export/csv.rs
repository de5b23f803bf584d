use crate::domain::model::Row;
use crate::export::cell_text;
use crate::utils::error::{ExtractError, Result};

/// One header record in resolved order, then one record per row in the same
/// column order. Missing keys render as empty fields; fields containing a
/// comma, quote or newline are double-quoted with internal quotes doubled.
pub fn generate_csv(rows: &[Row], headers: &[String]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|header| cell_text(row.fields.get(header)))
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::ProcessingError {
            message: format!("CSV buffer flush failed: {}", error),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::headers::resolve_headers;

    fn tagged_row(source: &str, pairs: &[(&str, serde_json::Value)]) -> Row {
        let mut fields = serde_json::Map::new();
        for (key, value) in pairs {
            fields.insert(key.to_string(), value.clone());
        }
        Row::with_source(source, fields)
    }

    #[test]
    fn quotes_only_where_needed() {
        let rows = vec![tagged_row(
            "a.png",
            &[
                ("comma", serde_json::json!("one, two")),
                ("plain", serde_json::json!("text")),
                ("quote", serde_json::json!("say \"hi\"")),
            ],
        )];
        let headers = resolve_headers(&rows);

        let output = generate_csv(&rows, &headers).unwrap();
        let expected = "source_file,comma,plain,quote\n\
                        a.png,\"one, two\",text,\"say \"\"hi\"\"\"\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn missing_keys_render_as_empty_fields() {
        let rows = vec![
            tagged_row("a.png", &[("alpha", serde_json::json!("1"))]),
            tagged_row("b.png", &[("beta", serde_json::json!("2"))]),
        ];
        let headers = resolve_headers(&rows);

        let output = generate_csv(&rows, &headers).unwrap();
        let expected = "source_file,alpha,beta\na.png,1,\nb.png,,2\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn string_fields_round_trip_through_a_csv_parse() {
        let rows = vec![tagged_row(
            "line\nbreak.png",
            &[
                ("note", serde_json::json!("multi\nline, with \"stuff\"")),
                ("plain", serde_json::json!("ok")),
            ],
        )];
        let headers = resolve_headers(&rows);
        let output = generate_csv(&rows, &headers).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let parsed_headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(|header| header.to_string())
            .collect();
        assert_eq!(parsed_headers, headers);

        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "line\nbreak.png");
        assert_eq!(&record[1], "multi\nline, with \"stuff\"");
        assert_eq!(&record[2], "ok");
    }
}
