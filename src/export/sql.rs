use std::collections::HashSet;

use serde_json::Value;

use crate::domain::model::Row;

/// Emits a `CREATE TABLE IF NOT EXISTS` statement followed by one `INSERT`
/// per row. Columns are the union of every row's keys in first-discovery
/// order; rows missing a column insert `NULL` for it. Every typed column is
/// declared `TEXT` and every non-null value is quoted, so the script loads
/// into SQLite or MySQL without a schema negotiation step.
pub fn generate_sql(rows: &[Row], table_name: &str) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut columns: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for row in rows {
        for key in row.fields.keys() {
            if seen.insert(key) {
                columns.push(key);
            }
        }
    }

    let table = quote_identifier(table_name);
    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    let column_defs = columns
        .iter()
        .map(|column| format!("  {} TEXT", quote_identifier(column)))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut statements = Vec::with_capacity(rows.len());
    for row in rows {
        let values = columns
            .iter()
            .map(|column| literal(row.fields.get(*column)))
            .collect::<Vec<_>>()
            .join(", ");
        statements.push(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table, column_list, values
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);\n\n{}",
        table,
        column_defs,
        statements.join("\n")
    )
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn literal(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(text)) => quote_text(text),
        Some(Value::Number(number)) => quote_text(&number.to_string()),
        Some(Value::Bool(flag)) => quote_text(&flag.to_string()),
        Some(nested) => quote_text(&nested.to_string()),
    }
}

fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        let mut fields = serde_json::Map::new();
        for (key, value) in pairs {
            fields.insert(key.to_string(), value.clone());
        }
        Row::from_fields(fields)
    }

    #[test]
    fn statement_layout_and_escaping() {
        let rows = vec![row(&[
            ("a", serde_json::json!("O'Brien")),
            ("b", serde_json::Value::Null),
        ])];

        let output = generate_sql(&rows, "t");
        let expected = "CREATE TABLE IF NOT EXISTS `t` (\n  `a` TEXT,\n  `b` TEXT\n);\n\n\
                        INSERT INTO `t` (`a`, `b`) VALUES ('O''Brien', NULL);";
        assert_eq!(output, expected);
    }

    #[test]
    fn columns_union_in_first_discovery_order() {
        let rows = vec![
            row(&[
                ("name", serde_json::json!("alpha")),
                ("price", serde_json::json!(3)),
            ]),
            row(&[
                ("name", serde_json::json!("beta")),
                ("qty", serde_json::json!(2)),
            ]),
        ];

        let output = generate_sql(&rows, "items");
        assert!(output.contains("(\n  `name` TEXT,\n  `price` TEXT,\n  `qty` TEXT\n);"));
        assert!(output.contains("VALUES ('alpha', '3', NULL);"));
        assert!(output.contains("VALUES ('beta', NULL, '2');"));
    }

    #[test]
    fn backticks_in_identifiers_are_doubled() {
        let rows = vec![row(&[("weird`col", serde_json::json!("x"))])];

        let output = generate_sql(&rows, "odd`table");
        assert!(output.contains("CREATE TABLE IF NOT EXISTS `odd``table`"));
        assert!(output.contains("`weird``col` TEXT"));
    }

    #[test]
    fn numbers_and_bools_are_stored_as_quoted_text() {
        let rows = vec![row(&[
            ("count", serde_json::json!(42)),
            ("ratio", serde_json::json!(0.5)),
            ("active", serde_json::json!(true)),
        ])];

        let output = generate_sql(&rows, "t");
        assert!(output.contains("VALUES ('42', '0.5', 'true');"));
    }

    #[test]
    fn nested_values_are_stored_as_compact_json() {
        let rows = vec![row(&[(
            "items",
            serde_json::json!([{"sku": "a'1"}]),
        )])];

        let output = generate_sql(&rows, "t");
        assert!(output.contains(r#"VALUES ('[{"sku":"a''1"}]');"#));
    }

    #[test]
    fn no_rows_means_no_script() {
        assert_eq!(generate_sql(&[], "t"), "");
    }
}
