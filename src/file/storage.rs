//! Local file storage for filedock.
//!
//! Uploaded files are moved from their temporary location into a flat
//! upload directory under their sanitized name:
//! ```text
//! {base_path}/
//! ├── photo.jpg
//! └── report_final__v2_.pdf
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Storage rooted at the upload directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory uploads are moved into.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a storage handle for `base_path`.
    ///
    /// The directory is not created; see [`ensure_dir`](Self::ensure_dir).
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Create the upload directory if it does not exist.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.base_path).await
    }

    /// Final location for a sanitized filename.
    pub fn destination(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, stored_name: &str) -> bool {
        fs::try_exists(self.destination(stored_name))
            .await
            .unwrap_or(false)
    }

    /// Move `src` to `dst`, replacing any existing file at `dst`.
    ///
    /// Tries a plain rename first. When source and destination are on
    /// different filesystems the bytes are copied into a hidden temp file next
    /// to `dst`, renamed into place, and only then is `src` removed. On error
    /// the temp file is removed and `dst` is left as it was.
    pub async fn relocate(&self, src: &Path, dst: &Path) -> io::Result<()> {
        match fs::rename(src, dst).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(src = %src.display(), dst = %dst.display(), "cross-device move, copying");
                Self::copy_then_swap(src, dst).await
            }
            Err(e) => Err(e),
        }
    }

    async fn copy_then_swap(src: &Path, dst: &Path) -> io::Result<()> {
        let temp = Self::temp_path_for(dst);

        let moved = async {
            fs::copy(src, &temp).await?;
            fs::rename(&temp, dst).await
        }
        .await;

        if let Err(e) = moved {
            let _ = fs::remove_file(&temp).await;
            return Err(e);
        }

        // The file is in place; a leftover source is only a stale temp file.
        if let Err(e) = fs::remove_file(src).await {
            debug!(src = %src.display(), error = %e, "could not remove source after copy");
        }
        Ok(())
    }

    /// Hidden sibling of `dst` used while copying across devices.
    fn temp_path_for(dst: &Path) -> PathBuf {
        let name = dst
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        dst.with_file_name(format!(".{name}.{}.part", Uuid::new_v4()))
    }
}
