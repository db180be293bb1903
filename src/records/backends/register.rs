use std::sync::Arc;

use serde::Deserialize;

use crate::records::template::RecordStore;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseConfigs {
    Sqlite {
        /// A direct connect uri, e.g. `sqlite://pinhole.db`.
        connection_uri: String,

        /// The *maximum* amount of pool connections.
        pool_size: u32,
    },

    /// An in-process store which keeps records in memory.
    ///
    /// Intended for tests and ephemeral deployments.
    Memory,
}

impl DatabaseConfigs {
    pub async fn connect(&self) -> anyhow::Result<Arc<dyn RecordStore>> {
        match self {
            Self::Sqlite {
                connection_uri,
                pool_size,
            } => {
                let backend =
                    super::sqlite::SqliteBackend::connect(connection_uri, *pool_size).await?;
                Ok(Arc::new(backend))
            },
            Self::Memory => Ok(Arc::new(super::memory::MemoryStore::default())),
        }
    }
}
