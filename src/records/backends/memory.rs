use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::records::template::RecordStore;
use crate::records::{ImageRecord, NewImageRecord};

/// An in-process record store, records are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ImageRecord>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: NewImageRecord) -> anyhow::Result<ImageRecord> {
        let stored = ImageRecord {
            id: Uuid::new_v4().to_string(),
            file_name: record.file_name,
            original_url: record.original_url,
            thumbnail_url: record.thumbnail_url,
            resolution: record.resolution,
            category: record.category,
            create_time: Utc::now(),
        };

        self.records
            .lock()
            .expect("lock memory store")
            .push(stored.clone());

        Ok(stored)
    }

    async fn list(&self) -> anyhow::Result<Vec<ImageRecord>> {
        Ok(self.records.lock().expect("lock memory store").clone())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<ImageRecord>> {
        let records = self.records.lock().expect("lock memory store");
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.records
            .lock()
            .expect("lock memory store")
            .retain(|record| record.id != id);

        Ok(())
    }
}
