//! Upload service for filedock.
//!
//! Runs the checks of an [`UploadPolicy`] against an [`UploadRequest`] in a
//! fixed order, moves the file into the upload directory and records it.

use tracing::{error, info, warn};

use crate::db::DbPool;

use super::filename::{extract_extension, sanitize_filename};
use super::metadata::{FileRepository, NewFileRecord};
use super::policy::UploadPolicy;
use super::request::UploadRequest;
use super::result::{StoredUpload, UploadError, UploadResult};
use super::storage::FileStorage;
use crate::FiledockError;

/// Validates and stores uploads according to a fixed policy.
#[derive(Debug, Clone)]
pub struct Uploader {
    policy: UploadPolicy,
    storage: FileStorage,
    pool: DbPool,
}

impl Uploader {
    /// Create an uploader for `policy`, recording uploads through `pool`.
    pub fn new(policy: UploadPolicy, pool: DbPool) -> Self {
        let storage = FileStorage::new(policy.upload_dir());
        Self {
            policy,
            storage,
            pool,
        }
    }

    /// The policy this uploader enforces.
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// The storage uploads are moved into.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Upload a file and report the outcome as a result value.
    ///
    /// Never fails: every rejection is folded into an [`UploadResult`].
    pub async fn upload(&self, request: &UploadRequest) -> UploadResult {
        self.try_upload(request).await.into()
    }

    /// Upload a file, returning the typed error on failure.
    ///
    /// Checks run in order and the first failure wins: size, transport error
    /// (if enabled), extension, MIME type. The file is moved only after all
    /// checks pass, and a record is inserted only after the move succeeded.
    /// If the insert fails the file stays where it was moved.
    pub async fn try_upload(&self, request: &UploadRequest) -> Result<StoredUpload, UploadError> {
        if let Err(e) = self.validate(request) {
            warn!(
                filename = %request.name,
                size = request.size,
                mime_type = %request.mime_type,
                kind = %e.kind(),
                "upload rejected"
            );
            return Err(e);
        }

        let stored_name = sanitize_filename(&request.name);
        let destination = self.storage.destination(&stored_name);

        if let Err(e) = self.storage.relocate(&request.tmp_name, &destination).await {
            error!(
                src = %request.tmp_name.display(),
                dst = %destination.display(),
                error = %e,
                "failed to move upload into place"
            );
            return Err(UploadError::RelocationFailed(e));
        }

        let path = destination.to_string_lossy().into_owned();
        let size = match i64::try_from(request.size) {
            Ok(size) => size,
            Err(_) => {
                error!(path = %path, size = request.size, "upload size does not fit a record");
                return Err(UploadError::PersistenceFailed(FiledockError::Validation(
                    format!("size {} is out of range", request.size),
                )));
            }
        };
        let record = NewFileRecord::new(&request.name, &path, size, &request.mime_type);

        let record_id = match FileRepository::new(&self.pool).insert(&record).await {
            Ok(id) => id,
            Err(e) => {
                error!(path = %path, error = %e, "failed to record upload");
                return Err(match e {
                    err @ FiledockError::DatabaseConnection(_) => {
                        UploadError::PersistenceUnavailable(err)
                    }
                    other => UploadError::PersistenceFailed(other),
                });
            }
        };

        info!(
            filename = %request.name,
            path = %path,
            size = request.size,
            record_id,
            "file uploaded"
        );

        Ok(StoredUpload {
            record_id,
            stored_name,
            path: destination,
        })
    }

    /// Run the policy checks without touching the filesystem or database.
    pub fn validate(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let policy = &self.policy;

        if !policy.allows_size(request.size) {
            return Err(UploadError::SizeExceeded {
                size: request.size,
                max: policy.max_file_size(),
            });
        }

        if policy.rejects_transport_errors() && request.error != 0 {
            return Err(UploadError::TransportError {
                code: request.error,
            });
        }

        if policy.restricts_extensions() {
            let extension = extract_extension(&request.name);
            if !policy.allows_extension(extension.as_deref()) {
                return Err(UploadError::ExtensionNotAllowed { extension });
            }
        }

        if !policy.allows_mime_type(&request.mime_type) {
            return Err(UploadError::MimeTypeNotAllowed {
                mime_type: request.mime_type.clone(),
            });
        }

        Ok(())
    }
}
