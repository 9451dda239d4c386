//! Test helpers for upload integration tests.
//!
//! Provides `TestEnv`: a temp directory with an upload dir, a staging dir for
//! incoming files, and an in-memory database.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use filedock::{Database, FileRepository, UploadPolicy, Uploader};

/// Isolated filesystem + database for one test.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub db: Database,
}

impl TestEnv {
    /// Create the directories and open an in-memory database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("uploads")).unwrap();
        std::fs::create_dir_all(temp_dir.path().join("incoming")).unwrap();
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        Self { temp_dir, db }
    }

    /// Directory uploads are moved into.
    pub fn upload_dir(&self) -> PathBuf {
        self.temp_dir.path().join("uploads")
    }

    /// Write an incoming file and return its temporary path.
    pub fn incoming(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join("incoming").join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Uploader for `policy` backed by this environment's database.
    pub fn uploader(&self, policy: UploadPolicy) -> Uploader {
        Uploader::new(policy, self.db.pool().clone())
    }

    /// Policy from the reference scenarios: jpg/png, no MIME list, 1,000,000 bytes.
    pub fn image_policy(&self) -> UploadPolicy {
        UploadPolicy::new(self.upload_dir())
            .with_allowed_extensions(["jpg", "png"])
            .with_max_file_size(1_000_000)
    }

    /// Number of rows in the `files` table.
    pub async fn record_count(&self) -> i64 {
        FileRepository::new(self.db.pool()).count().await.unwrap()
    }

    /// Names of the files in the upload directory, sorted.
    pub fn stored_names(&self) -> Vec<String> {
        list_names(&self.upload_dir())
    }
}

fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
