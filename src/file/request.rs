//! Upload request descriptor.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{FiledockError, Result};

/// A file waiting to be validated and stored.
///
/// Field names follow the input contract: `name`, `tmp_name`, `size`,
/// `error`, `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadRequest {
    /// Original filename as supplied by the client.
    pub name: String,
    /// Temporary location of the uploaded bytes.
    pub tmp_name: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Transport error code (0 = no error).
    #[serde(default)]
    pub error: i32,
    /// MIME type reported by the client.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl UploadRequest {
    /// Create a new upload request with no transport error.
    pub fn new(
        name: impl Into<String>,
        tmp_name: impl Into<PathBuf>,
        size: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tmp_name: tmp_name.into(),
            size,
            error: 0,
            mime_type: mime_type.into(),
        }
    }

    /// Set the transport error code.
    pub fn with_error(mut self, error: i32) -> Self {
        self.error = error;
        self
    }

    /// Describe a file already on local disk.
    ///
    /// The size comes from the file's metadata and the MIME type is guessed
    /// from its extension (`application/octet-stream` when unknown).
    pub async fn from_local_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(FiledockError::Validation(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                FiledockError::Validation(format!("{} has no file name", path.display()))
            })?;
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();

        Ok(Self::new(name, path, metadata.len(), mime_type.essence_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new() {
        let request = UploadRequest::new("photo.jpg", "/tmp/upload_123", 500, "image/jpeg");
        assert_eq!(request.name, "photo.jpg");
        assert_eq!(request.tmp_name, PathBuf::from("/tmp/upload_123"));
        assert_eq!(request.size, 500);
        assert_eq!(request.error, 0);
        assert_eq!(request.mime_type, "image/jpeg");
    }

    #[test]
    fn test_with_error() {
        let request = UploadRequest::new("a.txt", "/tmp/a", 1, "text/plain").with_error(3);
        assert_eq!(request.error, 3);
    }

    #[test]
    fn test_deserialize_input_contract() {
        let json = r#"{
            "name": "report.pdf",
            "tmp_name": "/tmp/upload_abc",
            "size": 1234,
            "error": 0,
            "type": "application/pdf"
        }"#;

        let request: UploadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            UploadRequest::new("report.pdf", "/tmp/upload_abc", 1234, "application/pdf")
        );
    }

    #[test]
    fn test_deserialize_missing_error_defaults_to_zero() {
        let json = r#"{"name": "a.txt", "tmp_name": "/tmp/a", "size": 1, "type": "text/plain"}"#;
        let request: UploadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.error, 0);
    }

    #[tokio::test]
    async fn test_from_local_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let request = UploadRequest::from_local_file(&path).await.unwrap();
        assert_eq!(request.name, "notes.txt");
        assert_eq!(request.tmp_name, path);
        assert_eq!(request.size, 5);
        assert_eq!(request.mime_type, "text/plain");
    }

    #[tokio::test]
    async fn test_from_local_file_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        std::fs::write(&path, b"x").unwrap();

        let request = UploadRequest::from_local_file(&path).await.unwrap();
        assert_eq!(request.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_local_file_missing() {
        let result = UploadRequest::from_local_file("/definitely/not/here.bin").await;
        assert!(matches!(result, Err(FiledockError::Io(_))));
    }

    #[tokio::test]
    async fn test_from_local_file_directory() {
        let dir = TempDir::new().unwrap();
        let result = UploadRequest::from_local_file(dir.path()).await;
        assert!(matches!(result, Err(FiledockError::Validation(_))));
    }
}
