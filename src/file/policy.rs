//! Upload policy: which uploads are accepted and where they are stored.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use mime::Mime;

use super::DEFAULT_MAX_FILE_SIZE;
use crate::config::UploadConfig;

/// Reference MIME allow-list: images, office documents, audio, video,
/// plain text/CSV and common archive formats.
pub const BUILTIN_MIME_TYPES: &[&str] = &[
    // Images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
    // Documents
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    // Audio
    "audio/mpeg",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    // Video
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-ms-wmv",
    // Text
    "text/plain",
    "text/csv",
    // Archives
    "application/zip",
    "application/x-rar-compressed",
    "application/x-tar",
    "application/x-gzip",
    "application/x-bzip2",
    "application/x-7z-compressed",
];

/// Immutable upload policy.
///
/// The extension and MIME checks are active once any entry has been supplied
/// for them, even if no entry survived normalization; such a policy rejects
/// every upload on that check. The configured MIME set is the only list
/// consulted; [`BUILTIN_MIME_TYPES`] takes part
/// only if it was loaded into the policy with
/// [`with_builtin_mime_types`](Self::with_builtin_mime_types).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    upload_dir: PathBuf,
    allowed_extensions: BTreeSet<String>,
    allowed_mime_types: BTreeSet<String>,
    restrict_extensions: bool,
    restrict_mime_types: bool,
    max_file_size: u64,
    reject_transport_errors: bool,
}

impl UploadPolicy {
    /// Create a policy for `upload_dir` with no type restrictions and the
    /// default size limit (5 MiB).
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            allowed_extensions: BTreeSet::new(),
            allowed_mime_types: BTreeSet::new(),
            restrict_extensions: false,
            restrict_mime_types: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            reject_transport_errors: false,
        }
    }

    /// Build a policy from the `[upload]` configuration section.
    ///
    /// Entries are not checked here; [`Config::validate`](crate::Config::validate)
    /// rejects lists with entries that normalize to nothing.
    pub fn from_config(config: &UploadConfig) -> Self {
        let mut policy = Self::new(&config.dir)
            .with_allowed_extensions(&config.allowed_extensions)
            .with_allowed_mime_types(&config.allowed_mime_types)
            .with_max_file_size(config.max_file_size)
            .with_transport_error_check(config.reject_transport_errors);
        if config.use_builtin_mime_types {
            policy = policy.with_builtin_mime_types();
        }
        policy
    }

    /// Add allowed extensions. Input is lowercased and a leading dot dropped.
    ///
    /// Any entry, valid or not, turns the extension check on.
    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            self.restrict_extensions = true;
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() {
                self.allowed_extensions.insert(ext);
            }
        }
        self
    }

    /// Add allowed MIME types. Input is reduced to its lowercase essence.
    ///
    /// Any entry turns the MIME check on. Entries that do not parse as a
    /// media type match nothing.
    pub fn with_allowed_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in mime_types {
            self.restrict_mime_types = true;
            if let Some(essence) = normalize_mime_type(value.as_ref()) {
                self.allowed_mime_types.insert(essence);
            }
        }
        self
    }

    /// Add every entry of [`BUILTIN_MIME_TYPES`] to the allowed MIME types.
    pub fn with_builtin_mime_types(self) -> Self {
        self.with_allowed_mime_types(BUILTIN_MIME_TYPES)
    }

    /// Set the maximum file size in bytes.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Reject requests whose transport error code is non-zero.
    pub fn with_transport_error_check(mut self, enabled: bool) -> Self {
        self.reject_transport_errors = enabled;
        self
    }

    /// Directory uploads are moved into.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Allowed extensions (lowercase, no leading dot).
    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    /// Allowed MIME type essences (lowercase).
    pub fn allowed_mime_types(&self) -> &BTreeSet<String> {
        &self.allowed_mime_types
    }

    /// Whether uploads are checked against the extension set.
    pub fn restricts_extensions(&self) -> bool {
        self.restrict_extensions
    }

    /// Whether uploads are checked against the MIME set.
    pub fn restricts_mime_types(&self) -> bool {
        self.restrict_mime_types
    }

    /// Maximum file size in bytes.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Whether a non-zero transport error code rejects the upload.
    pub fn rejects_transport_errors(&self) -> bool {
        self.reject_transport_errors
    }

    /// Whether a file of `size` bytes fits the size limit.
    pub fn allows_size(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    /// Whether `extension` passes the extension check.
    ///
    /// Always true when no extensions were configured. A missing extension
    /// never matches.
    pub fn allows_extension(&self, extension: Option<&str>) -> bool {
        if !self.restrict_extensions {
            return true;
        }
        extension.is_some_and(|ext| self.allowed_extensions.contains(&ext.to_lowercase()))
    }

    /// Whether the reported `mime_type` passes the MIME check.
    ///
    /// Always true when no MIME types were configured. Parameters such as
    /// `charset` are ignored; values that do not parse as a media type fail.
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        if !self.restrict_mime_types {
            return true;
        }
        normalize_mime_type(mime_type).is_some_and(|m| self.allowed_mime_types.contains(&m))
    }
}

/// Whether `ext` names an extension once normalized (`"."` does not).
pub fn is_valid_extension_entry(ext: &str) -> bool {
    !normalize_extension(ext).is_empty()
}

/// Whether `value` parses as a `type/subtype` media type.
pub fn is_valid_mime_entry(value: &str) -> bool {
    normalize_mime_type(value).is_some()
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn normalize_mime_type(value: &str) -> Option<String> {
    value
        .trim()
        .parse::<Mime>()
        .ok()
        .map(|m| m.essence_str().to_lowercase())
}
