//! Database connection and CRUD helpers
//!
//! [`Database`] wraps a single SQLite connection behind a mutex. Every call
//! blocks until the driver returns. Clones share the same connection, and
//! with it the same transaction state; callers that need parallel work open
//! one `Database` per thread.

use crate::collection::Collection;
use crate::config::DatabaseConfig;
use crate::criteria::{assignments, quote_ident, Criteria, PlaceholderNames};
use crate::error::{DbError, DbResult};
use crate::placeholder::{self, Expanded};
use crate::registry;
use crate::result::QueryResult;
use crate::value::{Fields, Param, Params, Row, Value};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle to an open database
#[derive(Clone)]
pub struct Database {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    session: Mutex<Session>,
    config: DatabaseConfig,
}

/// Connection plus the bookkeeping every statement updates
struct Session {
    conn: Connection,
    query_count: u64,
    last_query: Option<String>,
    last_row_count: usize,
    in_transaction: bool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.shared.config.path)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open a database with the given configuration
    pub fn open(config: DatabaseConfig) -> DbResult<Self> {
        info!(path = ?config.path, "Opening SQLite database");

        let conn = if config.is_memory() {
            Connection::open_in_memory()
        } else {
            if config.create_dirs {
                if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open(&config.path)
        }
        .map_err(|e| DbError::Connection(format!("Failed to open {}: {}", config.path.display(), e)))?;

        configure(&conn, &config)?;

        let db = Self {
            shared: Arc::new(Shared {
                session: Mutex::new(Session {
                    conn,
                    query_count: 0,
                    last_query: None,
                    last_row_count: 0,
                    in_transaction: false,
                }),
                config,
            }),
        };

        registry::register(&db);
        info!("SQLite database ready");
        Ok(db)
    }

    /// Open a private in-memory database
    pub fn memory() -> DbResult<Self> {
        Self::open(DatabaseConfig::memory())
    }

    /// Most recently opened database that is still alive
    pub fn latest() -> Option<Self> {
        registry::latest()
    }

    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub(crate) fn downgrade(&self) -> std::sync::Weak<Shared> {
        Arc::downgrade(&self.shared)
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.shared.config
    }

    /// Whether two handles share one connection
    pub fn same_connection(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Run a closure against the raw driver connection. The closure must not
    /// call back into this `Database`.
    pub fn with_connection<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let session = self.shared.session.lock();
        f(&session.conn)
    }

    /// Run a multi-statement script without bindings (schema setup and the like)
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let mut session = self.shared.session.lock();
        session.last_query = Some(sql.to_string());
        session
            .conn
            .execute_batch(sql)
            .map_err(|e| DbError::query(e, sql))
    }

    // ------------------------------------------------------------------
    // Raw queries
    // ------------------------------------------------------------------

    /// Prepare and execute a parameterised statement
    pub fn query(&self, sql: &str, params: &Params) -> DbResult<QueryResult> {
        self.shared.session.lock().run(sql, params)
    }

    /// Render `sql` with literals in place of placeholders, for logging.
    /// The output is not safe to execute.
    pub fn debug_query(&self, sql: &str, params: &Params) -> String {
        placeholder::interpolate(sql, params)
    }

    /// Alias of [`Database::debug_query`]
    pub fn interpolate_query(&self, sql: &str, params: &Params) -> String {
        self.debug_query(sql, params)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// First row matching `criteria`. Rows are unordered.
    pub fn fetch_row(&self, table: &str, criteria: &Criteria) -> DbResult<Option<Row>> {
        let filter = criteria.compile("");
        let sql = format!(
            "SELECT * FROM {} WHERE {} LIMIT 1",
            quote_ident(table),
            filter.sql
        );
        Ok(self.query(&sql, &filter.params)?.into_rows().into_iter().next())
    }

    /// One column of the first matching row
    pub fn fetch_cell(&self, table: &str, column: &str, criteria: &Criteria) -> DbResult<Option<Value>> {
        let filter = criteria.compile("");
        let sql = format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            quote_ident(column),
            quote_ident(table),
            filter.sql
        );
        Ok(self.query(&sql, &filter.params)?.scalar())
    }

    /// Alias of [`Database::fetch_cell`]
    pub fn fetch_field(&self, table: &str, column: &str, criteria: &Criteria) -> DbResult<Option<Value>> {
        self.fetch_cell(table, column, criteria)
    }

    /// One column across every matching row; empty when nothing matches
    pub fn fetch_column(&self, table: &str, column: &str, criteria: &Criteria) -> DbResult<Vec<Value>> {
        let filter = criteria.compile("");
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            quote_ident(column),
            quote_ident(table),
            filter.sql
        );
        Ok(self.query(&sql, &filter.params)?.column(0))
    }

    /// Every row matching `criteria`
    pub fn select(&self, table: &str, criteria: &Criteria) -> DbResult<Collection<Row>> {
        self.select_with(table, criteria, &Params::new())
    }

    /// Rows matching raw boolean expressions, e.g. `name LIKE :pattern`,
    /// joined with `AND`. `bindings` supplies their placeholders; list
    /// bindings expand for `IN :name` / `NOT IN :name`.
    pub fn search<I, S>(&self, table: &str, expressions: I, bindings: &Params) -> DbResult<Collection<Row>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_with(table, &Criteria::expressions(expressions), bindings)
    }

    /// Rows matching `criteria`, with extra bindings for its raw expressions.
    /// A binding whose name the criteria also generates is a `DbError::Query`.
    pub fn select_with(&self, table: &str, criteria: &Criteria, bindings: &Params) -> DbResult<Collection<Row>> {
        let filter = criteria.compile("");
        let sql = format!("SELECT * FROM {} WHERE {}", quote_ident(table), filter.sql);

        let mut params = bindings.clone();
        for (name, param) in filter.params.iter() {
            if params.get(name).is_some() {
                return Err(DbError::Query {
                    code: None,
                    message: format!(
                        "Binding :{} clashes with a placeholder generated for the criteria",
                        name
                    ),
                    sql,
                });
            }
            params.insert(name.clone(), param.clone());
        }

        Ok(self.query(&sql, &params)?.into_collection())
    }

    /// Number of rows matching `criteria`
    pub fn count(&self, table: &str, criteria: &Criteria) -> DbResult<u64> {
        let filter = criteria.compile("");
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            quote_ident(table),
            filter.sql
        );
        let count = self
            .query(&sql, &filter.params)?
            .scalar()
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Insert a row and return its generated rowid
    pub fn insert(&self, table: &str, fields: &Fields) -> DbResult<i64> {
        Ok(self.create_row("INSERT", table, fields)?.last_insert_id())
    }

    /// Insert many rows in one statement. Every row must have the same columns.
    pub fn insert_multiple(&self, table: &str, rows: &[Fields]) -> DbResult<QueryResult> {
        let Some(first) = rows.first() else {
            return Ok(QueryResult::default());
        };

        let columns: Vec<&String> = first.keys().collect();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() || columns.iter().any(|c| !row.contains_key(*c)) {
                return Err(DbError::Data(format!(
                    "Row {} of multi-row insert into {} has different columns than row 0",
                    i, table
                )));
            }
        }
        if columns.is_empty() {
            return Err(DbError::Data(format!(
                "Multi-row insert into {} needs at least one column",
                table
            )));
        }

        let mut params = Params::new();
        let mut tuples = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let prefix = format!("r{}_", i);
            let mut names = PlaceholderNames::new(&prefix);
            let mut binds = Vec::with_capacity(columns.len());
            for column in &columns {
                let name = names.next(column);
                binds.push(format!(":{}", name));
                let value = row.get(*column).cloned().unwrap_or(Value::Null);
                params.insert(name, Param::Value(value));
            }
            tuples.push(format!("({})", binds.join(", ")));
        }

        let column_list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            quote_ident(table),
            column_list.join(", "),
            tuples.join(", ")
        );
        self.query(&sql, &params)
    }

    /// Insert a row, deleting any row it conflicts with on a primary or
    /// unique key first. Returns the affected-row count.
    pub fn replace(&self, table: &str, fields: &Fields) -> DbResult<usize> {
        Ok(self.create_row("REPLACE", table, fields)?.row_count())
    }

    /// Insert a row, or on a primary/unique key conflict update the
    /// existing row to the supplied values
    pub fn upsert(&self, table: &str, fields: &Fields) -> DbResult<QueryResult> {
        if fields.is_empty() {
            return Err(DbError::Data(format!("Cannot upsert an empty row into {}", table)));
        }

        let (head, params) = insert_statement("INSERT", table, fields);
        let updates: Vec<String> = fields
            .keys()
            .map(|column| {
                let quoted = quote_ident(column);
                format!("{} = excluded.{}", quoted, quoted)
            })
            .collect();

        let sql = format!("{} ON CONFLICT DO UPDATE SET {}", head, updates.join(", "));
        self.query(&sql, &params)
    }

    /// Update rows matching `criteria`. Returns the affected-row count.
    pub fn update(&self, table: &str, fields: &Fields, criteria: &Criteria) -> DbResult<usize> {
        if fields.is_empty() {
            return Err(DbError::Data(format!("No fields to update in {}", table)));
        }
        if criteria.is_empty() {
            warn!(table, "UPDATE without criteria affects every row");
        }

        let set = assignments(fields, "new_");
        let filter = criteria.compile("old_");
        let mut params = set.params;
        params.extend(filter.params);

        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(table),
            set.sql,
            filter.sql
        );
        Ok(self.query(&sql, &params)?.row_count())
    }

    /// Delete rows matching `criteria`. Empty criteria delete every row.
    pub fn delete(&self, table: &str, criteria: &Criteria) -> DbResult<usize> {
        if criteria.is_empty() {
            warn!(table, "DELETE without criteria removes every row");
        }

        let filter = criteria.compile("");
        let sql = format!("DELETE FROM {} WHERE {}", quote_ident(table), filter.sql);
        Ok(self.query(&sql, &filter.params)?.row_count())
    }

    fn create_row(&self, verb: &str, table: &str, fields: &Fields) -> DbResult<QueryResult> {
        let (sql, params) = insert_statement(verb, table, fields);
        self.query(&sql, &params)
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Leave autocommit mode until [`commit`](Self::commit) or
    /// [`rollback`](Self::rollback). Transactions do not nest.
    pub fn transaction(&self) -> DbResult<()> {
        let mut session = self.shared.session.lock();
        if session.in_transaction {
            return Err(DbError::State(
                "A transaction is already active; nested transactions are not supported".to_string(),
            ));
        }

        session.control("BEGIN")?;
        session.in_transaction = true;
        debug!("Transaction started");
        Ok(())
    }

    /// Commit the active transaction
    pub fn commit(&self) -> DbResult<()> {
        let mut session = self.shared.session.lock();
        if !session.in_transaction {
            return Err(DbError::State(
                "Attempted to commit when not in a transaction".to_string(),
            ));
        }

        let outcome = session.control("COMMIT");
        session.in_transaction = !session.conn.is_autocommit();
        outcome?;
        debug!("Transaction committed");
        Ok(())
    }

    /// Roll back the active transaction
    pub fn rollback(&self) -> DbResult<()> {
        let mut session = self.shared.session.lock();
        if !session.in_transaction {
            return Err(DbError::State(
                "Attempted rollback when not in a transaction".to_string(),
            ));
        }

        let outcome = session.control("ROLLBACK");
        session.in_transaction = !session.conn.is_autocommit();
        outcome?;
        debug!("Transaction rolled back");
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.shared.session.lock().in_transaction
    }

    // ------------------------------------------------------------------
    // Bookkeeping
    // ------------------------------------------------------------------

    /// Rowid of the most recent successful insert on this connection
    pub fn last_insert_id(&self) -> i64 {
        self.shared.session.lock().conn.last_insert_rowid()
    }

    /// Number of statements executed successfully through [`Database::query`]
    pub fn query_count(&self) -> u64 {
        self.shared.session.lock().query_count
    }

    /// Text of the last statement attempted, whether or not it succeeded
    pub fn last_query(&self) -> Option<String> {
        self.shared.session.lock().last_query.clone()
    }

    /// Rows affected by the last successful statement
    pub fn last_row_count(&self) -> usize {
        self.shared.session.lock().last_row_count
    }
}

impl Session {
    fn run(&mut self, sql: &str, params: &Params) -> DbResult<QueryResult> {
        self.last_query = Some(sql.to_string());

        let expanded = placeholder::expand(sql, params)?;
        let result = execute(&self.conn, &expanded)?;

        self.query_count += 1;
        self.last_row_count = result.row_count();
        debug!(
            sql = %expanded.sql,
            params = expanded.binds.len(),
            rows = result.rows().len(),
            affected = result.row_count(),
            query_count = self.query_count,
            "Executed query"
        );

        Ok(result)
    }

    fn control(&mut self, sql: &str) -> DbResult<()> {
        self.last_query = Some(sql.to_string());
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::query(e, sql))
    }
}

/// `VERB INTO "table" (...) VALUES (...)` and its bindings
fn insert_statement(verb: &str, table: &str, fields: &Fields) -> (String, Params) {
    if fields.is_empty() {
        return (
            format!("{} INTO {} DEFAULT VALUES", verb, quote_ident(table)),
            Params::new(),
        );
    }

    let mut names = PlaceholderNames::new("");
    let mut params = Params::new();
    let mut columns = Vec::with_capacity(fields.len());
    let mut binds = Vec::with_capacity(fields.len());

    for (column, value) in fields {
        let name = names.next(column);
        columns.push(quote_ident(column));
        binds.push(format!(":{}", name));
        params.insert(name, Param::Value(value.clone()));
    }

    let sql = format!(
        "{} INTO {} ({}) VALUES ({})",
        verb,
        quote_ident(table),
        columns.join(", "),
        binds.join(", ")
    );
    (sql, params)
}

/// Prepare, bind and run one statement, reading every row it returns
fn execute(conn: &Connection, expanded: &Expanded) -> DbResult<QueryResult> {
    let sql = expanded.sql.as_str();
    let fail = |e: rusqlite::Error| DbError::query(e, sql);

    let mut stmt = conn.prepare(sql).map_err(fail)?;

    let mut bound = HashSet::with_capacity(expanded.binds.len());
    for (name, value) in &expanded.binds {
        let index = stmt
            .parameter_index(name)
            .map_err(fail)?
            .ok_or_else(|| fail(rusqlite::Error::InvalidParameterName(name.clone())))?;
        stmt.raw_bind_parameter(index, value).map_err(fail)?;
        bound.insert(index);
    }

    if let Some(missing) = (1..=stmt.parameter_count()).find(|i| !bound.contains(i)) {
        return Err(DbError::Query {
            code: None,
            message: format!(
                "Missing binding for {}",
                stmt.parameter_name(missing).unwrap_or("?")
            ),
            sql: sql.to_string(),
        });
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    if columns.is_empty() {
        let affected = stmt.raw_execute().map_err(fail)?;
        return Ok(QueryResult::new(columns, Vec::new(), affected, conn.last_insert_rowid()));
    }

    let mut rows = Vec::new();
    let mut cursor = stmt.raw_query();
    while let Some(row) = cursor.next().map_err(fail)? {
        let mut fields = Fields::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = row.get_ref(i).map_err(fail)?;
            fields.insert(column.clone(), Value::from(value));
        }
        rows.push(Row::from(fields));
    }
    drop(cursor);

    Ok(QueryResult::new(columns, rows, 0, conn.last_insert_rowid()))
}

/// Session setup: UTF-8 text encoding plus the configured pragmas
fn configure(conn: &Connection, config: &DatabaseConfig) -> DbResult<()> {
    debug!("Configuring SQLite pragmas");

    let pragma = |sql: String| {
        conn.execute_batch(&sql)
            .map_err(|e| DbError::Connection(format!("Failed to apply `{}`: {}", sql, e)))
    };

    pragma("PRAGMA encoding = 'UTF-8';".to_string())?;
    pragma(format!(
        "PRAGMA foreign_keys = {};",
        if config.foreign_keys { "ON" } else { "OFF" }
    ))?;
    pragma(format!("PRAGMA cache_size = {};", config.cache_size))?;

    if config.wal_mode && !config.is_memory() {
        pragma("PRAGMA journal_mode = WAL;".to_string())?;
        pragma("PRAGMA synchronous = NORMAL;".to_string())?;
    }

    conn.busy_timeout(Duration::from_millis(u64::from(config.busy_timeout_ms)))
        .map_err(|e| DbError::Connection(format!("Failed to set busy timeout: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use tracing_test::traced_test;

    fn movies() -> Database {
        let db = Database::memory().expect("Failed to open memory database");
        db.execute_batch(
            "CREATE TABLE movies (
                mid INTEGER PRIMARY KEY AUTOINCREMENT,
                movie_name TEXT,
                added TEXT
            );",
        )
        .expect("Failed to create table");
        db
    }

    #[test]
    fn test_query_counts_and_records_sql() {
        let db = movies();
        assert_eq!(db.query_count(), 0);

        db.query("SELECT 1", &Params::new()).unwrap();
        assert_eq!(db.query_count(), 1);
        assert_eq!(db.last_query().as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_failed_query_still_records_sql() {
        let db = movies();
        let err = db.query("SELECT * FROM nowhere", &Params::new()).unwrap_err();

        assert!(matches!(err, DbError::Query { .. }));
        assert_eq!(db.last_query().as_deref(), Some("SELECT * FROM nowhere"));
        assert_eq!(db.query_count(), 0);
    }

    #[test]
    fn test_missing_binding_is_an_error() {
        let db = movies();
        let err = db
            .query("SELECT * FROM movies WHERE mid = :mid", &Params::new())
            .unwrap_err();

        match err {
            DbError::Query { message, .. } => assert!(message.contains(":mid")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_binding_is_an_error() {
        let db = movies();
        let result = db.query("SELECT 1", &Params::new().bind("extra", 1));
        assert!(matches!(result, Err(DbError::Query { .. })));
    }

    #[test]
    fn test_insert_returns_integer_key() {
        let db = movies();
        let first = db.insert("movies", &fields! { "movie_name" => "Alien" }).unwrap();
        let second = db.insert("movies", &fields! { "movie_name" => "Heat" }).unwrap();

        assert_eq!(second, first + 1);
        assert_eq!(db.last_insert_id(), second);
    }

    #[test]
    fn test_insert_without_fields_uses_defaults() {
        let db = movies();
        let id = db.insert("movies", &Fields::new()).unwrap();

        let row = db.fetch_row("movies", &Criteria::by("mid", id)).unwrap().unwrap();
        assert_eq!(row.get("movie_name"), Some(&Value::Null));
    }

    #[test]
    fn test_update_uses_namespaced_bindings() {
        let db = movies();
        let id = db.insert("movies", &fields! { "movie_name" => "Old" }).unwrap();

        let affected = db
            .update(
                "movies",
                &fields! { "movie_name" => "New" },
                &Criteria::by("movie_name", "Old").eq("mid", id),
            )
            .unwrap();

        assert_eq!(affected, 1);
        assert_eq!(db.last_row_count(), 1);
        assert_eq!(
            db.fetch_cell("movies", "movie_name", &Criteria::by("mid", id)).unwrap(),
            Some(Value::from("New"))
        );
    }

    #[test]
    fn test_update_requires_fields() {
        let db = movies();
        let err = db.update("movies", &Fields::new(), &Criteria::by("mid", 1)).unwrap_err();
        assert!(matches!(err, DbError::Data(_)));
    }

    #[test]
    fn test_insert_multiple_rejects_mismatched_rows() {
        let db = movies();
        let err = db
            .insert_multiple(
                "movies",
                &[fields! { "movie_name" => "a" }, fields! { "added" => "b" }],
            )
            .unwrap_err();
        assert!(matches!(err, DbError::Data(_)));

        let empty = db.insert_multiple("movies", &[]).unwrap();
        assert_eq!(empty.row_count(), 0);
    }

    #[test]
    fn test_debug_query_does_not_touch_counters() {
        let db = movies();
        let sql = db.debug_query(
            "SELECT foo FROM bar WHERE baz = :smth",
            &Params::new().bind("smth", "something"),
        );

        assert_eq!(sql, "SELECT foo FROM bar WHERE baz = 'something'");
        assert_eq!(db.interpolate_query("SELECT :a", &Params::new().bind("a", 1)), "SELECT '1'");
        assert_eq!(db.query_count(), 0);
    }

    #[test]
    fn test_nested_transaction_rejected() {
        let db = movies();
        db.transaction().unwrap();
        assert!(db.in_transaction());

        let err = db.transaction().unwrap_err();
        assert!(matches!(err, DbError::State(_)));

        db.rollback().unwrap();
        assert!(!db.in_transaction());
    }

    #[test]
    fn test_commit_and_rollback_require_transaction() {
        let db = movies();
        assert!(matches!(db.commit(), Err(DbError::State(_))));
        assert!(matches!(db.rollback(), Err(DbError::State(_))));

        db.transaction().unwrap();
        db.commit().unwrap();
        assert!(matches!(db.commit(), Err(DbError::State(_))));
    }

    #[test]
    fn test_with_connection_exposes_driver() {
        let db = movies();
        let tables: i64 = db
            .with_connection(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'movies'",
                    [],
                    |row| row.get(0),
                )
                .map_err(|e| DbError::query(e, "sqlite_master"))
            })
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_clones_share_connection() {
        let db = movies();
        let other = db.clone();
        other.insert("movies", &fields! { "movie_name" => "Shared" }).unwrap();

        assert!(db.same_connection(&other));
        assert_eq!(db.count("movies", &Criteria::all()).unwrap(), 1);
        assert!(!db.same_connection(&movies()));
    }

    #[test]
    #[traced_test]
    fn test_unbounded_writes_warn() {
        let db = movies();
        db.insert("movies", &fields! { "movie_name" => "Alien" }).unwrap();

        db.update("movies", &fields! { "added" => "today" }, &Criteria::all()).unwrap();
        assert!(logs_contain("UPDATE without criteria"));

        db.delete("movies", &Criteria::all()).unwrap();
        assert!(logs_contain("DELETE without criteria"));
    }

    #[test]
    #[traced_test]
    fn test_bounded_delete_does_not_warn() {
        let db = movies();
        db.delete("movies", &Criteria::by("mid", 1)).unwrap();
        assert!(!logs_contain("without criteria"));
    }
}
