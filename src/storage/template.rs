use async_trait::async_trait;
use bytes::Bytes;

/// The per-reference outcome of a blob deletion.
///
/// Deletions are best effort, individual failures are reported here
/// rather than failing the call as a whole.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub reference: String,
    pub ok: bool,
    pub message: Option<String>,
}

#[async_trait]
pub trait BlobStorageBackend: Sync + Send + 'static {
    /// Stores the given data under the given path and returns a
    /// stable reference which can later be used to delete the blob.
    async fn upload(&self, path: &str, data: Bytes) -> anyhow::Result<String>;

    /// Deletes each of the given references, reporting a per-reference
    /// outcome. This never fails the call as a whole.
    async fn delete(&self, references: &[String]) -> Vec<DeleteOutcome>;
}
