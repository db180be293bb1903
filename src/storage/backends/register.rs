use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::storage::template::BlobStorageBackend;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendConfigs {
    FileSystem {
        /// The root directory blobs are written beneath.
        directory: PathBuf,
    },

    /// An in-process backend which keeps blobs in memory.
    ///
    /// Intended for tests and ephemeral deployments, nothing survives
    /// a restart.
    Memory,
}

impl BackendConfigs {
    pub async fn connect(&self) -> anyhow::Result<Arc<dyn BlobStorageBackend>> {
        match self {
            Self::FileSystem { directory } => Ok(Arc::new(
                super::filesystem::FileSystemBackend::new(directory.clone()),
            )),
            Self::Memory => Ok(Arc::new(super::memory::MemoryBackend::default())),
        }
    }
}
