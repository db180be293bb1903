use async_trait::async_trait;

use crate::records::{ImageRecord, NewImageRecord};

#[async_trait]
pub trait RecordStore: Sync + Send + 'static {
    /// Inserts a new record, assigning it an id and creation time.
    async fn insert(&self, record: NewImageRecord) -> anyhow::Result<ImageRecord>;

    /// Returns every record in store-native order.
    async fn list(&self) -> anyhow::Result<Vec<ImageRecord>>;

    /// Fetches a single record by id if it exists.
    async fn get(&self, id: &str) -> anyhow::Result<Option<ImageRecord>>;

    /// Removes a record by id.
    ///
    /// Removing an id with no backing record is not an error.
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
}
