pub mod config;
pub mod core;
pub mod domain;
pub mod encode;
pub mod export;
pub mod recognition;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::cli::LocalStorage;
pub use crate::core::runner::ExtractionRunner;
pub use crate::core::state::{Action, PipelineState};
pub use crate::encode::FileSystemEncoder;
pub use crate::recognition::gemini::GeminiRecognizer;
pub use crate::utils::error::{ExtractError, Result};
