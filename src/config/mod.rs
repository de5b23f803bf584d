pub mod cli;
pub mod profile;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

use crate::utils::error::{ExtractError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};

pub const EXPORT_FORMATS: &[&str] = &["json", "csv", "sql"];

pub const LOG_FORMATS: &[&str] = &["text", "json"];

pub(crate) fn validate_log_format(field_name: &str, format: &str) -> Result<()> {
    if !LOG_FORMATS.contains(&format) {
        return Err(ExtractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format.to_string(),
            reason: format!(
                "Unsupported log format. Valid formats: {}",
                LOG_FORMATS.join(", ")
            ),
        });
    }
    Ok(())
}

pub(crate) fn validate_export_formats(field_name: &str, formats: &[String]) -> Result<()> {
    for format in formats {
        if !EXPORT_FORMATS.contains(&format.as_str()) {
            return Err(ExtractError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    EXPORT_FORMATS.join(", ")
                ),
            });
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "snaptable")]
#[command(about = "Extract structured rows from document images into JSON, CSV and SQL")]
pub struct CliConfig {
    #[arg(help = "Image files to process")]
    pub files: Vec<String>,

    #[arg(long, default_value = "https://generativelanguage.googleapis.com")]
    pub endpoint: String,

    #[arg(long, help = "API key; falls back to the GEMINI_API_KEY environment variable")]
    pub api_key: Option<String>,

    #[arg(long, default_value = "gemini-2.5-flash")]
    pub model: String,

    #[arg(long, default_value = "imported_data")]
    pub table_name: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json,csv,sql")]
    pub formats: Vec<String>,

    #[arg(long, help = "Pack all generated artifacts into one ZIP archive")]
    pub bundle: bool,

    #[arg(long, default_value = "3")]
    pub concurrent_requests: usize,

    #[arg(long, default_value = "60")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Path to a TOML profile; profile values override flags")]
    pub config: Option<String>,

    #[arg(long, default_value = "text", help = "Log output format: text or json")]
    pub log_format: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log system resource usage while running")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Flag value first, then the `GEMINI_API_KEY` environment variable.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| ExtractError::MissingConfigError {
                field: "api_key".to_string(),
            })
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("model", &self.model)?;
        validation::validate_non_empty_string("table_name", &self.table_name)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("concurrent_requests", self.concurrent_requests, 1, 32)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validate_export_formats("formats", &self.formats)?;
        validate_log_format("log_format", &self.log_format)?;
        validation::validate_file_extensions(
            "files",
            &self.files,
            crate::encode::SUPPORTED_EXTENSIONS,
        )?;
        validation::validate_unique_file_names("files", &self.files)?;
        Ok(())
    }
}
