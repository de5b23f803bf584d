use crate::config::validate_export_formats;
use crate::utils::error::{ExtractError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub recognition: Option<RecognitionProfile>,
    pub export: Option<ExportProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionProfile {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportProfile {
    pub output_path: Option<String>,
    pub formats: Option<Vec<String>>,
    pub table_name: Option<String>,
    pub bundle: Option<bool>,
}

impl ProfileConfig {
    /// 從 TOML 檔案載入設定檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExtractError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定檔
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExtractError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證設定值的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(recognition) = &self.recognition {
            if let Some(endpoint) = &recognition.endpoint {
                validation::validate_url("recognition.endpoint", endpoint)?;
            }
            if let Some(concurrent) = recognition.concurrent_requests {
                validation::validate_range("recognition.concurrent_requests", concurrent, 1, 32)?;
            }
            if let Some(timeout) = recognition.timeout_seconds {
                validation::validate_range("recognition.timeout_seconds", timeout, 1, 600)?;
            }
        }

        if let Some(export) = &self.export {
            if let Some(output_path) = &export.output_path {
                validation::validate_path("export.output_path", output_path)?;
            }
            if let Some(formats) = &export.formats {
                validate_export_formats("export.formats", formats)?;
            }
            if let Some(table_name) = &export.table_name {
                validation::validate_non_empty_string("export.table_name", table_name)?;
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ProfileConfig {
    // Profile values win over flags. Flags all carry defaults, so a run with
    // --config is driven by the file and the flags only fill the gaps.
    pub fn apply(&self, config: &mut super::CliConfig) {
        if let Some(recognition) = &self.recognition {
            if let Some(endpoint) = &recognition.endpoint {
                config.endpoint = endpoint.clone();
            }
            if let Some(api_key) = &recognition.api_key {
                config.api_key = Some(api_key.clone());
            }
            if let Some(model) = &recognition.model {
                config.model = model.clone();
            }
            if let Some(timeout) = recognition.timeout_seconds {
                config.timeout_seconds = timeout;
            }
            if let Some(concurrent) = recognition.concurrent_requests {
                config.concurrent_requests = concurrent;
            }
        }

        if let Some(export) = &self.export {
            if let Some(output_path) = &export.output_path {
                config.output_path = output_path.clone();
            }
            if let Some(formats) = &export.formats {
                config.formats = formats.clone();
            }
            if let Some(table_name) = &export.table_name {
                config.table_name = table_name.clone();
            }
            if let Some(bundle) = export.bundle {
                config.bundle = bundle;
            }
        }
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
