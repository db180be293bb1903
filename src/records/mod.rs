use chrono::{DateTime, Utc};
use poem_openapi::Object;

pub mod backends;
pub mod template;

/// The metadata record kept for every successfully ingested image.
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct ImageRecord {
    /// The store-assigned unique identifier of the record.
    pub id: String,

    /// The original file name supplied by the uploader.
    ///
    /// This is not guaranteed to be unique.
    pub file_name: String,

    /// The blob reference of the full-size upload.
    pub original_url: String,

    /// The blob reference of the thumbnail upload.
    pub thumbnail_url: String,

    /// The resolution of the original image, measured from the
    /// decoded bytes at ingestion time.
    pub resolution: Resolution,

    /// A free-text classification, empty by default.
    pub category: String,

    /// The server-assigned time the record was inserted.
    pub create_time: DateTime<Utc>,
}

#[derive(Object, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// The caller-provided fields of a record, the store assigns `id` and
/// `create_time` on insert.
#[derive(Debug, Clone)]
pub struct NewImageRecord {
    pub file_name: String,
    pub original_url: String,
    pub thumbnail_url: String,
    pub resolution: Resolution,
    pub category: String,
}
