use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Key under which every extracted row records the file it came from.
pub const SOURCE_FILE_FIELD: &str = "source_file";

/// One extracted record: a string-keyed map of heterogeneous JSON values.
/// Key insertion order is part of the data and survives serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Row {
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }

    /// Rebuilds the row with `source_file` as its first key. A field of the
    /// same name coming from the recognition service is dropped.
    pub fn with_source(file_name: &str, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut tagged = serde_json::Map::with_capacity(fields.len() + 1);
        tagged.insert(
            SOURCE_FILE_FIELD.to_string(),
            serde_json::Value::String(file_name.to_string()),
        );
        for (key, value) in fields {
            if key != SOURCE_FILE_FIELD {
                tagged.insert(key, value);
            }
        }
        Self { fields: tagged }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn from_path(raw: &str) -> Self {
        let path = PathBuf::from(raw);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.to_string());
        Self { name, path }
    }
}

/// Base64 image payload ready for a recognition request.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub media_type: String,
    pub payload: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileStatus::Pending => "pending",
            FileStatus::Processing => "processing",
            FileStatus::Success => "success",
            FileStatus::Error => "error",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One progress line. Entries are append-only once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            message: message.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// User-facing notice attached to the pipeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Processing,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_source_puts_source_file_first() {
        let mut fields = serde_json::Map::new();
        fields.insert("item".to_string(), serde_json::json!("Coffee"));
        fields.insert("price".to_string(), serde_json::json!("3.50"));

        let row = Row::with_source("receipt.png", fields);
        let keys: Vec<&String> = row.fields.keys().collect();

        assert_eq!(keys, ["source_file", "item", "price"]);
        assert_eq!(
            row.fields.get("source_file"),
            Some(&serde_json::json!("receipt.png"))
        );
    }

    #[test]
    fn with_source_overrides_model_supplied_tag() {
        let mut fields = serde_json::Map::new();
        fields.insert("source_file".to_string(), serde_json::json!("bogus.png"));
        fields.insert("item".to_string(), serde_json::json!("Tea"));

        let row = Row::with_source("real.png", fields);

        assert_eq!(
            row.fields.get("source_file"),
            Some(&serde_json::json!("real.png"))
        );
        assert_eq!(row.fields.len(), 2);
    }

    #[test]
    fn source_file_from_path_uses_file_name() {
        let file = SourceFile::from_path("scans/2024/receipt.png");
        assert_eq!(file.name, "receipt.png");
        assert_eq!(file.path, PathBuf::from("scans/2024/receipt.png"));
    }
}
