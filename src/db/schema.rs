//! Database schema and migrations for filedock.
//!
//! Migrations are applied in order; the `schema_version` table records
//! which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: metadata for stored uploads
    r#"
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    filename    TEXT NOT NULL,               -- original (unsanitized) name
    path        TEXT NOT NULL,               -- final location on disk
    size        INTEGER NOT NULL,
    type        TEXT NOT NULL,               -- MIME type reported by the client
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_path ON files(path);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
        assert!(MIGRATIONS.iter().all(|m| !m.trim().is_empty()));
    }

    #[test]
    fn test_first_migration_creates_files_table() {
        assert!(MIGRATIONS[0].contains("CREATE TABLE files"));
    }
}
