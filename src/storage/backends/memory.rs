use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use hashbrown::HashMap;

use crate::storage::template::{BlobStorageBackend, DeleteOutcome};

#[derive(Default)]
pub struct MemoryBackend {
    blobs: Mutex<HashMap<String, Bytes>>,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(reference)
    }

    pub fn get(&self, reference: &str) -> Option<Bytes> {
        self.blobs.lock().unwrap().get(reference).cloned()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::Relaxed)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BlobStorageBackend for MemoryBackend {
    async fn upload(&self, path: &str, data: Bytes) -> anyhow::Result<String> {
        self.upload_calls.fetch_add(1, Ordering::Relaxed);

        debug!("Storing blob in memory @ {}", path);
        self.blobs
            .lock()
            .expect("lock memory store")
            .insert(path.to_string(), data);

        Ok(path.to_string())
    }

    async fn delete(&self, references: &[String]) -> Vec<DeleteOutcome> {
        self.delete_calls.fetch_add(1, Ordering::Relaxed);

        let mut blobs = self.blobs.lock().expect("lock memory store");
        references
            .iter()
            .map(|reference| {
                debug!("Purging blob in memory @ {}", reference);
                let existed = blobs.remove(reference).is_some();
                DeleteOutcome {
                    reference: reference.clone(),
                    ok: true,
                    message: (!existed).then(|| "blob was already absent".to_string()),
                }
            })
            .collect()
    }
}
