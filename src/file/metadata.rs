//! Metadata records for stored uploads.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::db::DbPool;
use crate::{FiledockError, Result};

/// A persisted row of the `files` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique record ID.
    pub id: i64,
    /// Original filename as supplied by the client.
    pub filename: String,
    /// Final stored path.
    pub path: String,
    /// File size in bytes.
    pub size: i64,
    /// MIME type reported by the client.
    #[sqlx(rename = "type")]
    pub mime_type: String,
    /// When the record was inserted (SQLite `datetime('now')`, UTC).
    pub created_at: String,
}

impl FileRecord {
    /// Get the created_at as DateTime<Utc>.
    pub fn created_at_datetime(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|dt| dt.and_utc())
    }
}

/// Data for a new metadata row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileRecord {
    /// Original filename.
    pub filename: String,
    /// Final stored path.
    pub path: String,
    /// File size in bytes.
    pub size: i64,
    /// Reported MIME type.
    pub mime_type: String,
}

impl NewFileRecord {
    /// Create a new NewFileRecord.
    pub fn new(
        filename: impl Into<String>,
        path: impl Into<String>,
        size: i64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// Repository for file metadata. Records are insert-only.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a record and return its ID.
    ///
    /// A connection is acquired from the pool for the insert and returned to
    /// it on drop. Acquisition failures surface as
    /// [`FiledockError::DatabaseConnection`], insert failures as
    /// [`FiledockError::Database`].
    pub async fn insert(&self, record: &NewFileRecord) -> Result<i64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| FiledockError::DatabaseConnection(e.to_string()))?;

        let result = sqlx::query("INSERT INTO files (filename, path, size, type) VALUES (?, ?, ?, ?)")
            .bind(&record.filename)
            .bind(&record.path)
            .bind(record.size)
            .bind(&record.mime_type)
            .execute(&mut *conn)
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a record and read it back.
    pub async fn create(&self, record: &NewFileRecord) -> Result<FileRecord> {
        let id = self.insert(record).await?;
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FiledockError::NotFound("file record".to_string()))
    }

    /// Get a record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, path, size, type, created_at FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Get the most recent record for a stored path.
    ///
    /// Several records can share a path when sanitized names collide.
    pub async fn get_by_path(&self, path: &str) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, path, size, type, created_at
             FROM files WHERE path = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(path)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Count all records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
