use std::str::FromStr;

use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::records::template::RecordStore;
use crate::records::{ImageRecord, NewImageRecord, Resolution};

use async_trait::async_trait;

/// A record store backed by a SQLite database.
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub async fn connect(connection_uri: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(connection_uri)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await?;

        info!("successfully connected to sqlite");

        let backend = Self { pool };
        backend.ensure_tables().await?;

        Ok(backend)
    }

    async fn ensure_tables(&self) -> Result<()> {
        debug!("building images table");

        let qry = "
        CREATE TABLE IF NOT EXISTS images (
            id TEXT PRIMARY KEY,
            file_name TEXT NOT NULL,
            original_url TEXT NOT NULL,
            thumbnail_url TEXT NOT NULL,
            width INTEGER NOT NULL,
            height INTEGER NOT NULL,
            category TEXT NOT NULL,
            create_time TEXT NOT NULL
        );";

        sqlx::query(qry).execute(&self.pool).await?;

        Ok(())
    }
}

fn extract_record(row: SqliteRow) -> ImageRecord {
    ImageRecord {
        id: row.get("id"),
        file_name: row.get("file_name"),
        original_url: row.get("original_url"),
        thumbnail_url: row.get("thumbnail_url"),
        resolution: Resolution {
            width: row.get("width"),
            height: row.get("height"),
        },
        category: row.get("category"),
        create_time: row.get("create_time"),
    }
}

#[async_trait]
impl RecordStore for SqliteBackend {
    async fn insert(&self, record: NewImageRecord) -> Result<ImageRecord> {
        let stored = ImageRecord {
            id: Uuid::new_v4().to_string(),
            file_name: record.file_name,
            original_url: record.original_url,
            thumbnail_url: record.thumbnail_url,
            resolution: record.resolution,
            category: record.category,
            create_time: Utc::now(),
        };

        let qry = "
        INSERT INTO images (
            id, file_name, original_url, thumbnail_url,
            width, height, category, create_time
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?);";

        sqlx::query(qry)
            .bind(&stored.id)
            .bind(&stored.file_name)
            .bind(&stored.original_url)
            .bind(&stored.thumbnail_url)
            .bind(stored.resolution.width)
            .bind(stored.resolution.height)
            .bind(&stored.category)
            .bind(stored.create_time)
            .execute(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<ImageRecord>> {
        let rows = sqlx::query("SELECT * FROM images;")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(extract_record).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<ImageRecord>> {
        let row = sqlx::query("SELECT * FROM images WHERE id = ? LIMIT 1;")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(extract_record))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM images WHERE id = ?;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect_in_memory() -> SqliteBackend {
        // A pool size of 1 keeps every query on the same in-memory
        // database connection.
        SqliteBackend::connect("sqlite::memory:", 1)
            .await
            .expect("connect to in-memory sqlite")
    }

    fn sample_record() -> NewImageRecord {
        NewImageRecord {
            file_name: "sunset.jpg".to_string(),
            original_url: "images/sunset.jpg".to_string(),
            thumbnail_url: "images/thumbnail_sunset.jpg".to_string(),
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            category: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_create_time() -> Result<()> {
        let backend = connect_in_memory().await;

        let record = backend.insert(sample_record()).await?;
        assert!(!record.id.is_empty());
        assert_eq!(record.file_name, "sunset.jpg");

        let fetched = backend.get(&record.id).await?.expect("record exists");
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.resolution, record.resolution);
        assert_eq!(
            fetched.create_time.timestamp(),
            record.create_time.timestamp()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_delete() -> Result<()> {
        let backend = connect_in_memory().await;

        let record = backend.insert(sample_record()).await?;
        assert_eq!(backend.list().await?.len(), 1);

        backend.delete(&record.id).await?;
        assert!(backend.get(&record.id).await?.is_none());
        assert!(backend.list().await?.is_empty());

        // Deleting an absent id is not an error.
        backend.delete(&record.id).await?;

        Ok(())
    }
}
