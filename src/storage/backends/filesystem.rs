use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::storage::template::{BlobStorageBackend, DeleteOutcome};

pub struct FileSystemBackend {
    directory: PathBuf,
}

impl FileSystemBackend {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl BlobStorageBackend for FileSystemBackend {
    async fn upload(&self, path: &str, data: Bytes) -> anyhow::Result<String> {
        let store_in = self.directory.join(path);

        debug!("Storing blob @ {:?}", &store_in);
        match tokio::fs::write(&store_in, &data).await {
            Ok(()) => Ok(path.to_string()),
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = store_in.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&store_in, data).await?;
                Ok(path.to_string())
            },
            Err(other) => Err(other.into()),
        }
    }

    async fn delete(&self, references: &[String]) -> Vec<DeleteOutcome> {
        let mut outcomes = Vec::with_capacity(references.len());

        for reference in references {
            let target = self.directory.join(reference);
            debug!("Purging blob @ {:?}", &target);

            let outcome = match tokio::fs::remove_file(&target).await {
                // A missing blob is treated the same as a deleted one.
                Ok(()) => DeleteOutcome {
                    reference: reference.clone(),
                    ok: true,
                    message: None,
                },
                Err(ref e) if e.kind() == ErrorKind::NotFound => DeleteOutcome {
                    reference: reference.clone(),
                    ok: true,
                    message: Some("blob was already absent".to_string()),
                },
                Err(other) => DeleteOutcome {
                    reference: reference.clone(),
                    ok: false,
                    message: Some(other.to_string()),
                },
            };

            outcomes.push(outcome);
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_delete_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let backend = FileSystemBackend::new(dir.path().to_path_buf());

        let reference = backend
            .upload("images/example.jpg", Bytes::from_static(b"not real bytes"))
            .await?;
        assert_eq!(reference, "images/example.jpg");
        assert!(dir.path().join("images/example.jpg").exists());

        let outcomes = backend.delete(&[reference]).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].ok);
        assert!(!dir.path().join("images/example.jpg").exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_missing_blob_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSystemBackend::new(dir.path().to_path_buf());

        let outcomes = backend.delete(&["images/ghost.jpg".to_string()]).await;
        assert!(outcomes[0].ok);
        assert!(outcomes[0].message.is_some());
    }
}
