//! filedock - validated file uploads
//!
//! Checks uploaded files against a policy, moves them into a storage
//! directory under a sanitized name and records their metadata in SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;

pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{FiledockError, Result};
pub use file::{
    sanitize_filename, FileRecord, FileRepository, FileStorage, StoredUpload, UploadError,
    UploadErrorKind, UploadPolicy, UploadRequest, UploadResult, Uploader, BUILTIN_MIME_TYPES,
    DEFAULT_MAX_FILE_SIZE,
};
