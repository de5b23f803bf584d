pub mod dedupe;
pub mod headers;
pub mod runner;
pub mod state;

pub use crate::domain::model::{Row, SourceFile};
pub use crate::domain::ports::{ImageEncoder, Recognizer, SpreadsheetEncoder, Storage};
pub use crate::utils::error::Result;
