//! Shared fixtures for integration tests

#![allow(dead_code)]

use tabula::{Database, DatabaseConfig};
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
    CREATE TABLE movies (
        mid INTEGER PRIMARY KEY AUTOINCREMENT,
        movie_name TEXT,
        added TEXT
    );

    CREATE TABLE test_table (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        varchar_col TEXT,
        text_col TEXT,
        datetime_col TEXT
    );

    CREATE TABLE tokens (
        id TEXT PRIMARY KEY,
        label TEXT
    );
"#;

/// In-memory database with the test schema applied
pub fn memory_db() -> Database {
    let db = Database::memory().expect("Failed to open in-memory database");
    db.execute_batch(SCHEMA).expect("Failed to apply schema");
    db
}

/// File-backed database in a temporary directory. Keep the `TempDir`
/// alive for as long as the database is used.
pub fn file_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig::new(dir.path().join("nested").join("test.db")).with_wal_mode(true);
    let db = Database::open(config).expect("Failed to open database file");
    db.execute_batch(SCHEMA).expect("Failed to apply schema");
    (dir, db)
}
