use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use bytes::Bytes;
use image::GenericImageView;
use poem_openapi::Object;

use crate::config::ThumbnailConfig;
use crate::errors::PipelineError;
use crate::processor;
use crate::records::template::RecordStore;
use crate::records::{ImageRecord, NewImageRecord, Resolution};
use crate::storage::template::{BlobStorageBackend, DeleteOutcome};

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UploadInfo {
    /// The file name the image was uploaded under.
    pub file_name: String,

    /// The blob reference of the full-size image.
    pub url: String,

    /// The blob reference of the derived thumbnail.
    pub thumbnail_url: String,
}

/// The orchestrator of the ingestion, deletion and listing operations.
///
/// The blob store and record store are injected so tests can swap in
/// in-memory fakes.
pub struct ImageController {
    storage: Arc<dyn BlobStorageBackend>,
    records: Arc<dyn RecordStore>,
    thumbnail: ThumbnailConfig,
    request_timeout: Duration,
}

impl ImageController {
    pub fn new(
        storage: Arc<dyn BlobStorageBackend>,
        records: Arc<dyn RecordStore>,
        thumbnail: ThumbnailConfig,
        request_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            records,
            thumbnail,
            request_timeout,
        }
    }

    /// The ingestion pipeline.
    ///
    /// Decode, measure and derive run before any write is issued, so a
    /// rejected payload leaves zero blobs and zero records behind. The
    /// two uploads stay sequential: once the original upload succeeds
    /// any later failure cleans up the already-uploaded blobs before
    /// surfacing the error.
    pub async fn upload_image(
        &self,
        file_content: &str,
        file_name: &str,
    ) -> Result<UploadInfo, PipelineError> {
        if file_content.is_empty() {
            return Err(PipelineError::Validation("fileContent"));
        }
        if file_name.is_empty() {
            return Err(PipelineError::Validation("fileName"));
        }

        let raw = base64::decode(file_content).map_err(|e| PipelineError::Decode(e.to_string()))?;
        let raw = Bytes::from(raw);

        // Decoding and resizing are CPU bound, keep them off the
        // async workers.
        let thumbnail_cfg = self.thumbnail;
        let decode_input = raw.clone();
        let (resolution, thumbnail) = tokio::task::spawn_blocking(move || {
            let img = processor::decode_image(&decode_input)
                .map_err(|e| PipelineError::Decode(e.to_string()))?;

            let (width, height) = img.dimensions();
            let thumbnail = processor::thumbnail::derive_thumbnail(&img, &thumbnail_cfg)
                .map_err(PipelineError::Internal)?;

            Ok::<_, PipelineError>((Resolution { width, height }, thumbnail))
        })
        .await
        .map_err(|e| PipelineError::Internal(e.into()))??;

        let original_path = format!("images/{}", file_name);
        let original_url = self
            .bounded(self.storage.upload(&original_path, raw))
            .await
            .map_err(PipelineError::Storage)?;

        let mut uploaded = vec![original_url.clone()];

        let thumbnail_path = format!("images/thumbnail_{}", file_name);
        let thumbnail_url = match self.bounded(self.storage.upload(&thumbnail_path, thumbnail)).await
        {
            Ok(reference) => reference,
            Err(e) => {
                warn!(
                    "thumbnail upload for {} failed after the original succeeded: {}",
                    file_name, e
                );
                self.clean_up_orphans(&uploaded).await;
                return Err(PipelineError::Storage(e));
            },
        };
        uploaded.push(thumbnail_url.clone());

        let record = NewImageRecord {
            file_name: file_name.to_string(),
            original_url,
            thumbnail_url,
            resolution,
            category: String::new(),
        };

        let record = match self.bounded(self.records.insert(record)).await {
            Ok(record) => record,
            Err(e) => {
                warn!("metadata commit for {} failed: {}", file_name, e);
                self.clean_up_orphans(&uploaded).await;
                return Err(PipelineError::Internal(e));
            },
        };

        debug!(
            "ingested image {} as {} ({}x{})",
            file_name, &record.id, resolution.width, resolution.height,
        );

        Ok(UploadInfo {
            file_name: record.file_name,
            url: record.original_url,
            thumbnail_url: record.thumbnail_url,
        })
    }

    /// The deletion pipeline.
    ///
    /// Blob deletions are best effort: failures are logged and the
    /// record is removed regardless, removing the record is what makes
    /// the image disappear for users.
    pub async fn remove_image(&self, id: &str) -> Result<String, PipelineError> {
        if id.is_empty() {
            return Err(PipelineError::Validation("id"));
        }

        let record = self
            .bounded(self.records.get(id))
            .await
            .map_err(PipelineError::Internal)?
            .ok_or(PipelineError::NotFound)?;

        let references: Vec<String> = [record.original_url, record.thumbnail_url]
            .into_iter()
            .filter(|reference| !reference.is_empty())
            .collect();

        // The two blob deletions are independent, run them
        // concurrently.
        let deletes = references.into_iter().map(|r| self.delete_blob(r));
        let outcomes = futures::future::join_all(deletes).await;

        for outcome in outcomes.into_iter().flatten() {
            if !outcome.ok {
                warn!(
                    "failed to delete blob {} for image {}: {:?}",
                    outcome.reference, id, outcome.message,
                );
            }
        }

        self.bounded(self.records.delete(id))
            .await
            .map_err(PipelineError::Internal)?;

        info!("removed image {}", id);
        Ok(id.to_string())
    }

    /// The listing operation, a pass-through query of the record
    /// store.
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, PipelineError> {
        self.bounded(self.records.list())
            .await
            .map_err(PipelineError::Internal)
    }

    async fn delete_blob(&self, reference: String) -> Vec<DeleteOutcome> {
        let fut = self.storage.delete(std::slice::from_ref(&reference));
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(outcomes) => outcomes,
            Err(_) => vec![DeleteOutcome {
                reference,
                ok: false,
                message: Some("blob deletion timed out".to_string()),
            }],
        }
    }

    /// Best-effort removal of blobs uploaded by a failed ingestion.
    async fn clean_up_orphans(&self, references: &[String]) {
        match tokio::time::timeout(self.request_timeout, self.storage.delete(references)).await {
            Ok(outcomes) => {
                for outcome in outcomes {
                    if !outcome.ok {
                        warn!(
                            "failed to clean up orphaned blob {}: {:?}",
                            outcome.reference, outcome.message,
                        );
                    }
                }
            },
            Err(_) => warn!("timed out cleaning up orphaned blobs: {:?}", references),
        }
    }

    /// Bounds a remote call with the configured timeout, a call which
    /// exceeds it is treated as failed.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(anyhow!(
                "remote call exceeded the configured {}s timeout",
                self.request_timeout.as_secs(),
            )),
        }
    }
}
