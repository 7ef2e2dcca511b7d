//! Error types for the data-access layer

use thiserror::Error;

/// Data-access error type
#[derive(Error, Debug)]
pub enum DbError {
    /// Driver unavailable or the database could not be opened
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed to prepare, bind or execute
    #[error("Query error{}: {message}", .code.map(|c| format!(" ({})", c)).unwrap_or_default())]
    Query {
        /// Extended SQLite result code, when the driver reported one
        code: Option<i32>,
        message: String,
        sql: String,
    },

    /// Transaction API misuse
    #[error("State error: {0}")]
    State(String),

    /// Attempt to persist an entity without any data
    #[error("Data error: {0}")]
    Data(String),

    /// Key field read through the generic field getter
    #[error("Access error: {0}")]
    Access(String),

    /// Unsupported input to `Entity::load`
    #[error("Type error: {0}")]
    Type(String),

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data-access operations
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Wrap a driver error raised while running `sql`.
    pub(crate) fn query(err: rusqlite::Error, sql: &str) -> Self {
        let code = err.sqlite_error().map(|e| e.extended_code);
        let message = match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
            other => other.to_string(),
        };

        DbError::Query {
            code,
            message,
            sql: sql.to_string(),
        }
    }

    /// Driver error code, if this is a query failure that carried one
    pub fn code(&self) -> Option<i32> {
        match self {
            DbError::Query { code, .. } => *code,
            _ => None,
        }
    }
}
