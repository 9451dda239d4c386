//! Configuration module for filedock.

use serde::Deserialize;
use std::path::Path;

use crate::file::{is_valid_extension_entry, is_valid_mime_entry, DEFAULT_MAX_FILE_SIZE};
use crate::{FiledockError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before giving up.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_db_path() -> String {
    "data/filedock.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

/// Upload policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded files are moved into.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Allowed extensions (empty = any extension).
    #[serde(default)]
    pub allowed_extensions: Vec<String>,
    /// Allowed MIME types (empty = any type).
    #[serde(default)]
    pub allowed_mime_types: Vec<String>,
    /// Add the built-in MIME allow-list to `allowed_mime_types`.
    #[serde(default)]
    pub use_builtin_mime_types: bool,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Reject requests carrying a non-zero transport error code.
    #[serde(default)]
    pub reject_transport_errors: bool,
}

fn default_upload_dir() -> String {
    "data/uploads".to_string()
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            allowed_extensions: Vec::new(),
            allowed_mime_types: Vec::new(),
            use_builtin_mime_types: false,
            max_file_size: default_max_file_size(),
            reject_transport_errors: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filedock.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload policy configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledockError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FiledockError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEDOCK_UPLOAD_DIR`: upload directory
    /// - `FILEDOCK_DATABASE_PATH`: SQLite database file
    /// - `FILEDOCK_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = non_empty_env("FILEDOCK_UPLOAD_DIR") {
            self.upload.dir = dir;
        }
        if let Some(path) = non_empty_env("FILEDOCK_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(level) = non_empty_env("FILEDOCK_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the upload directory is empty
    /// - the maximum file size is zero
    /// - the connection pool size is zero
    pub fn validate(&self) -> Result<()> {
        if self.upload.dir.trim().is_empty() {
            return Err(FiledockError::Config("upload.dir must not be empty".to_string()));
        }
        if self.upload.max_file_size == 0 {
            return Err(FiledockError::Config(
                "upload.max_file_size must be greater than zero".to_string(),
            ));
        }
        // Sizes are stored as SQLite INTEGER.
        if i64::try_from(self.upload.max_file_size).is_err() {
            return Err(FiledockError::Config(format!(
                "upload.max_file_size must not exceed {}",
                i64::MAX
            )));
        }
        if let Some(ext) = self
            .upload
            .allowed_extensions
            .iter()
            .find(|ext| !is_valid_extension_entry(ext))
        {
            return Err(FiledockError::Config(format!(
                "upload.allowed_extensions: invalid entry {ext:?}"
            )));
        }
        if let Some(mime) = self
            .upload
            .allowed_mime_types
            .iter()
            .find(|m| !is_valid_mime_entry(m))
        {
            return Err(FiledockError::Config(format!(
                "upload.allowed_mime_types: {mime:?} is not a type/subtype media type"
            )));
        }
        if self.database.max_connections == 0 {
            return Err(FiledockError::Config(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
