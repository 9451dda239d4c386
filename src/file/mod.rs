//! File upload module for filedock.
//!
//! This module provides the upload pipeline:
//! - Policy checks (size, extension, MIME type)
//! - Filename sanitization
//! - Relocation into the upload directory
//! - Metadata records in the `files` table

mod filename;
mod metadata;
mod policy;
mod request;
mod result;
mod service;
mod storage;

pub use filename::{extract_extension, is_safe_filename, sanitize_filename};
pub use metadata::{FileRecord, FileRepository, NewFileRecord};
pub use policy::{is_valid_extension_entry, is_valid_mime_entry, UploadPolicy, BUILTIN_MIME_TYPES};
pub use request::UploadRequest;
pub use result::{StoredUpload, UploadError, UploadErrorKind, UploadResult, MSG_UPLOADED};
pub use service::Uploader;
pub use storage::FileStorage;

/// Default maximum file size (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
