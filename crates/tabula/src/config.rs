//! Database configuration
//!
//! Connection settings normally come from the application's bootstrap layer.
//! They can be built in code or read from a TOML file, either as top-level
//! keys or under a `[database]` table:
//!
//! ```toml
//! [database]
//! path = "./data/app.db"
//! foreign_keys = true
//! busy_timeout_ms = 2000
//! ```

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Path value that selects a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// SQLite connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file, or `:memory:`
    pub path: PathBuf,
    /// Create the parent directory of `path` if it is missing
    pub create_dirs: bool,
    pub foreign_keys: bool,
    pub wal_mode: bool,
    pub busy_timeout_ms: u32,
    /// Negative values are KiB, positive values are pages (SQLite semantics)
    pub cache_size: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            create_dirs: true,
            foreign_keys: true,
            wal_mode: false,
            busy_timeout_ms: 5000,
            cache_size: -2000,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    database: Option<DatabaseConfig>,
    #[serde(flatten)]
    inline: DatabaseConfig,
}

impl DatabaseConfig {
    /// Configuration for a file-backed database at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Configuration for a private in-memory database
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    pub fn with_wal_mode(mut self, enabled: bool) -> Self {
        self.wal_mode = enabled;
        self
    }

    pub fn with_busy_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    pub fn with_cache_size(mut self, cache_size: i64) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_create_dirs(mut self, enabled: bool) -> Self {
        self.create_dirs = enabled;
        self
    }

    /// Parse a TOML document. A `[database]` table wins over top-level keys.
    pub fn from_toml_str(source: &str) -> DbResult<Self> {
        let file: ConfigFile = toml::from_str(source)
            .map_err(|e| DbError::Config(format!("Invalid database config: {}", e)))?;

        Ok(file.database.unwrap_or(file.inline))
    }

    /// Read and parse a TOML configuration file. A file that cannot be read
    /// is a [`DbError::Io`] error; invalid contents are [`DbError::Config`].
    pub fn from_file(path: impl AsRef<Path>) -> DbResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
