//! Parameterized SQL and active-record entities over SQLite
//!
//! Tabula wraps a SQLite connection with a small data-access layer:
//! named-parameter queries with list expansion, CRUD helpers that build
//! their SQL from column/value maps, and typed entities that load, save and
//! delete themselves.
//!
//! ## Features
//!
//! - **Database**: one connection behind a mutex, shared by cheap clones
//! - **Criteria**: column/value filters compiled to `WHERE` clauses with
//!   collision-free placeholders; `NULL` and list values handled
//! - **List parameters**: `:ids` bound to a list expands to `(:ids_0, :ids_1, ...)`
//! - **Entities**: auto-increment, UUIDv4 or UUIDv7 primary keys
//! - **Collections**: ordered, keyed, countable, with a rewindable cursor
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tabula::{fields, Criteria, Database, DatabaseConfig};
//!
//! let db = Database::open(DatabaseConfig::new("./app.db"))?;
//! let id = db.insert("movies", &fields! { "movie_name" => "Alien" })?;
//!
//! let rows = db.select("movies", &Criteria::by("mid", id))?;
//! let total = db.count("movies", &Criteria::all())?;
//! ```

pub mod collection;
pub mod config;
pub mod connection;
pub mod criteria;
pub mod entity;
pub mod error;
mod placeholder;
pub mod registry;
pub mod result;
pub mod value;

// Re-exports
pub use collection::{Collection, Columnar};
pub use config::DatabaseConfig;
pub use connection::Database;
pub use criteria::{quote_ident, Compiled, Condition, Criteria, Joiner};
pub use entity::{Entity, KeyStrategy, Load, Loaded, Saved, Table};
pub use error::{DbError, DbResult};
pub use result::QueryResult;
pub use value::{Fields, Key, Param, Params, Row, Value};
