//! Upload outcomes: typed errors and the result value handed to callers.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Message returned for a successful upload.
pub const MSG_UPLOADED: &str = "File uploaded successfully.";

/// Stable classification of upload failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadErrorKind {
    /// File is larger than the policy allows.
    SizeExceeded,
    /// The transport layer reported an incomplete upload.
    TransportError,
    /// Extension is not in the allowed set.
    ExtensionNotAllowed,
    /// Reported MIME type is not in the allowed set.
    MimeTypeNotAllowed,
    /// Moving the file into the upload directory failed.
    RelocationFailed,
    /// The metadata insert failed.
    PersistenceFailed,
    /// No database connection could be acquired.
    PersistenceUnavailable,
}

impl UploadErrorKind {
    /// String representation used in serialized results and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            UploadErrorKind::SizeExceeded => "size_exceeded",
            UploadErrorKind::TransportError => "transport_error",
            UploadErrorKind::ExtensionNotAllowed => "extension_not_allowed",
            UploadErrorKind::MimeTypeNotAllowed => "mime_type_not_allowed",
            UploadErrorKind::RelocationFailed => "relocation_failed",
            UploadErrorKind::PersistenceFailed => "persistence_failed",
            UploadErrorKind::PersistenceUnavailable => "persistence_unavailable",
        }
    }
}

impl std::fmt::Display for UploadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an upload was rejected. `Display` is the user-facing message.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File is larger than the policy allows.
    #[error("File size exceeds the maximum allowed size.")]
    SizeExceeded {
        /// Reported size in bytes.
        size: u64,
        /// Policy limit in bytes.
        max: u64,
    },

    /// The transport layer reported an incomplete upload.
    #[error("File upload was not completed.")]
    TransportError {
        /// Transport error code from the request.
        code: i32,
    },

    /// Extension is not in the allowed set.
    #[error("File extension is not allowed.")]
    ExtensionNotAllowed {
        /// Lowercased extension, if the filename had one.
        extension: Option<String>,
    },

    /// Reported MIME type is not in the allowed set.
    #[error("File type is not allowed.")]
    MimeTypeNotAllowed {
        /// MIME type as reported by the client.
        mime_type: String,
    },

    /// Moving the file into the upload directory failed.
    #[error("Error uploading file.")]
    RelocationFailed(#[source] std::io::Error),

    /// The metadata insert failed; the file stays on disk.
    #[error("Error uploading file to the database.")]
    PersistenceFailed(#[source] crate::FiledockError),

    /// No database connection could be acquired; the file stays on disk.
    #[error("Database connection is not available.")]
    PersistenceUnavailable(#[source] crate::FiledockError),
}

impl UploadError {
    /// Classification of this error.
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::SizeExceeded { .. } => UploadErrorKind::SizeExceeded,
            UploadError::TransportError { .. } => UploadErrorKind::TransportError,
            UploadError::ExtensionNotAllowed { .. } => UploadErrorKind::ExtensionNotAllowed,
            UploadError::MimeTypeNotAllowed { .. } => UploadErrorKind::MimeTypeNotAllowed,
            UploadError::RelocationFailed(_) => UploadErrorKind::RelocationFailed,
            UploadError::PersistenceFailed(_) => UploadErrorKind::PersistenceFailed,
            UploadError::PersistenceUnavailable(_) => UploadErrorKind::PersistenceUnavailable,
        }
    }
}

/// A file that passed validation, was moved and was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Id of the inserted metadata row.
    pub record_id: i64,
    /// Sanitized on-disk filename.
    pub stored_name: String,
    /// Final location of the file.
    pub path: PathBuf,
}

/// Outcome of [`Uploader::upload`](super::Uploader::upload).
///
/// Serializes to `{ "success", "message", "path"?, "kind"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    /// Whether the file was stored and recorded.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Final stored path, only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Failure classification, only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<UploadErrorKind>,
}

impl UploadResult {
    /// A successful result pointing at `path`.
    pub fn stored(path: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            message: MSG_UPLOADED.to_string(),
            path: Some(path.into().to_string_lossy().into_owned()),
            kind: None,
        }
    }

    /// A failed result for `error`.
    pub fn failed(error: &UploadError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            path: None,
            kind: Some(error.kind()),
        }
    }
}

impl From<std::result::Result<StoredUpload, UploadError>> for UploadResult {
    fn from(outcome: std::result::Result<StoredUpload, UploadError>) -> Self {
        match outcome {
            Ok(stored) => Self::stored(stored.path),
            Err(e) => Self::failed(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FiledockError;

    #[test]
    fn test_error_messages() {
        let cases: Vec<(UploadError, &str)> = vec![
            (
                UploadError::SizeExceeded { size: 2, max: 1 },
                "File size exceeds the maximum allowed size.",
            ),
            (
                UploadError::ExtensionNotAllowed { extension: Some("exe".into()) },
                "File extension is not allowed.",
            ),
            (
                UploadError::MimeTypeNotAllowed { mime_type: "x/y".into() },
                "File type is not allowed.",
            ),
            (
                UploadError::RelocationFailed(std::io::Error::other("disk full")),
                "Error uploading file.",
            ),
            (
                UploadError::PersistenceFailed(FiledockError::Database("boom".into())),
                "Error uploading file to the database.",
            ),
        ];

        for (error, message) in cases {
            assert_eq!(error.to_string(), message);
        }
    }

    #[test]
    fn test_error_kind() {
        let err = UploadError::PersistenceUnavailable(FiledockError::DatabaseConnection(
            "pool closed".into(),
        ));
        assert_eq!(err.kind(), UploadErrorKind::PersistenceUnavailable);
    }

    #[test]
    fn test_relocation_error_keeps_source() {
        use std::error::Error as _;

        let err = UploadError::RelocationFailed(std::io::Error::other("permission denied"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("permission denied"));
    }

    #[test]
    fn test_kind_as_str_matches_serde() {
        let json = serde_json::to_string(&UploadErrorKind::MimeTypeNotAllowed).unwrap();
        assert_eq!(json, "\"mime_type_not_allowed\"");
        assert_eq!(UploadErrorKind::SizeExceeded.to_string(), "size_exceeded");
    }

    #[test]
    fn test_success_result_serialization() {
        let result = UploadResult::stored("/uploads/photo.jpg");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": true,
                "message": "File uploaded successfully.",
                "path": "/uploads/photo.jpg"
            })
        );
    }

    #[test]
    fn test_failure_result_serialization() {
        let result = UploadResult::failed(&UploadError::SizeExceeded { size: 2, max: 1 });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": false,
                "message": "File size exceeds the maximum allowed size.",
                "kind": "size_exceeded"
            })
        );
    }
}
