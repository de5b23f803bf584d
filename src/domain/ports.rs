use crate::domain::model::{EncodedImage, Row, SourceFile};
use crate::utils::error::Result;
use async_trait::async_trait;

/// External recognition service turning encoded images into structured rows.
/// Returned rows are untagged; the orchestrator owns `source_file` tagging.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn extract_rows(&self, images: &[EncodedImage]) -> Result<Vec<Row>>;
}

#[async_trait]
pub trait ImageEncoder: Send + Sync {
    async fn encode(&self, file: &SourceFile) -> Result<EncodedImage>;
}

/// Opaque spreadsheet construction. The pipeline supplies the cell grid in
/// resolved header order; the binary format is the encoder's business.
pub trait SpreadsheetEncoder: Send + Sync {
    fn encode(&self, headers: &[String], grid: &[Vec<String>]) -> Result<Vec<u8>>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
