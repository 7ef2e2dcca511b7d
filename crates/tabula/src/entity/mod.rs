//! Active-record entities
//!
//! An entity type is a marker implementing [`Table`]: the backing table, its
//! primary-key column, and optionally a [`KeyStrategy`]. [`Entity<T>`] then
//! carries one row of that table plus its key.
//!
//! ```rust,ignore
//! struct Movie;
//!
//! impl Table for Movie {
//!     const NAME: &'static str = "movies";
//!     const KEY: &'static str = "mid";
//! }
//!
//! let mut movie = Entity::<Movie>::new();
//! movie.set(&db, fields! { "movie_name" => "Alien" }, None)?;
//! let id = movie.save(&db)?;
//! ```
//!
//! An entity is *new* until it has a key and *persisted* afterwards; both
//! facts derive only from whether the key is set. `save` inserts new entities
//! and updates persisted ones. Deleting does not reset the key, so saving a
//! deleted entity updates nothing rather than re-inserting it.

mod key;

pub use key::KeyStrategy;

use crate::collection::{Collection, Columnar};
use crate::connection::Database;
use crate::criteria::Criteria;
use crate::error::{DbError, DbResult};
use crate::result::QueryResult;
use crate::value::{Fields, Key, Params, Row, Value};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Schema facts every entity type supplies
pub trait Table {
    /// Backing table name
    const NAME: &'static str;
    /// Primary-key column name
    const KEY: &'static str;

    fn key_strategy() -> KeyStrategy {
        KeyStrategy::AutoIncrement
    }
}

/// Input accepted by [`Entity::load`]
#[derive(Debug, Clone, PartialEq)]
pub enum Load {
    /// One id
    One(Value),
    /// Several ids, one lookup each
    Many(Vec<Value>),
    /// Rows already fetched from the entity's table
    Rows(Vec<Row>),
}

/// Output of [`Entity::load`]
pub enum Loaded<T: Table> {
    One(Entity<T>),
    Many(Collection<Entity<T>>),
}

impl<T: Table> Loaded<T> {
    pub fn into_one(self) -> Option<Entity<T>> {
        match self {
            Loaded::One(entity) => Some(entity),
            Loaded::Many(_) => None,
        }
    }

    pub fn into_many(self) -> Option<Collection<Entity<T>>> {
        match self {
            Loaded::One(_) => None,
            Loaded::Many(collection) => Some(collection),
        }
    }
}

/// Outcome of [`Entity::save`]
#[derive(Debug, Clone, PartialEq)]
pub enum Saved {
    /// Row inserted; carries the new key
    Inserted(Value),
    /// Row updated; carries the data that was written
    Updated(Fields),
}

/// One row of `T`'s table
pub struct Entity<T: Table> {
    key: Option<Value>,
    data: Fields,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> Entity<T> {
    /// A new, empty entity
    pub fn new() -> Self {
        Self {
            key: None,
            data: Fields::new(),
            _table: PhantomData,
        }
    }

    /// A new entity populated through [`Entity::set`]
    pub fn with_data(db: &Database, data: Fields, allowed: Option<&[&str]>) -> DbResult<Self> {
        let mut entity = Self::new();
        entity.set(db, data, allowed)?;
        Ok(entity)
    }

    /// Look up the row with key `id`.
    ///
    /// When no such row exists the result is still `Ok`: a new entity whose
    /// key field is pre-filled with `id`, ready to be inserted under it. Use
    /// [`Entity::find`] to tell the two cases apart.
    pub fn from_id(db: &Database, id: impl Into<Value>) -> DbResult<Self> {
        let id = id.into();
        if id.is_null() || id.is_blank_text() {
            return Ok(Self::new());
        }

        let mut data = Fields::new();
        data.insert(T::KEY.to_string(), id);
        Self::with_data(db, data, None)
    }

    /// The persisted entity with key `id`, or `None` if there is none
    pub fn find(db: &Database, id: impl Into<Value>) -> DbResult<Option<Self>> {
        let row = db.fetch_row(T::NAME, &Criteria::by(T::KEY, id))?;
        Ok(row.map(Self::hydrate))
    }

    /// Wrap a row fetched from `T`'s table without another lookup. The
    /// entity is persisted if the row carries a non-null key.
    pub fn hydrate(row: Row) -> Self {
        let data = row.into_fields();
        let key = data.get(T::KEY).filter(|v| !v.is_null()).cloned();

        Self {
            key,
            data,
            _table: PhantomData,
        }
    }

    /// Load one id, several ids, or a set of fetched rows.
    ///
    /// Several ids or rows produce a collection keyed by entity id when
    /// `index_by_ids` is set (entities without a key keep their position),
    /// or by position otherwise.
    pub fn load(db: &Database, input: Load, index_by_ids: bool) -> DbResult<Loaded<T>> {
        match input {
            Load::One(id) => Ok(Loaded::One(Self::from_id(db, checked_id::<T>(id)?)?)),
            Load::Many(ids) => {
                let mut entities = Vec::with_capacity(ids.len());
                for id in ids {
                    entities.push(Self::from_id(db, checked_id::<T>(id)?)?);
                }
                Ok(Loaded::Many(index(entities, index_by_ids)))
            }
            Load::Rows(rows) => {
                let entities = rows.into_iter().map(Self::hydrate).collect();
                Ok(Loaded::Many(index(entities, index_by_ids)))
            }
        }
    }

    /// Entities matching raw expressions such as `name LIKE :pattern`,
    /// keyed by entity id
    pub fn search<I, S>(db: &Database, expressions: I, bindings: &Params) -> DbResult<Collection<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = db.search(T::NAME, expressions, bindings)?;
        let entities = rows.into_iter().map(Self::hydrate).collect();
        Ok(index(entities, true))
    }

    /// Merge `data` into the entity.
    ///
    /// Blank strings become `NULL`. With `allowed`, only those fields are
    /// taken. If `data` carries a key that matches a stored row, the entity
    /// first takes on that row (becoming persisted) and the rest of `data`
    /// is merged over it.
    pub fn set(&mut self, db: &Database, data: Fields, allowed: Option<&[&str]>) -> DbResult<&mut Self> {
        let mut data: Fields = data
            .into_iter()
            .map(|(field, value)| {
                if value.is_blank_text() {
                    (field, Value::Null)
                } else {
                    (field, value)
                }
            })
            .collect();

        if let Some(allowed) = allowed {
            data.retain(|field, _| allowed.contains(&field.as_str()));
        }

        if let Some(key) = data.get(T::KEY).filter(|v| !v.is_null()).cloned() {
            if let Some(row) = db.fetch_row(T::NAME, &Criteria::by(T::KEY, key))? {
                let stored = Self::hydrate(row);
                debug!(table = T::NAME, key = %stored.key.clone().unwrap_or(crate::value::Value::Null), "Entity matched stored row");
                self.key = stored.key;
                self.data = stored.data;
                data.shift_remove(T::KEY);
            }
        }

        self.data.extend(data);
        Ok(self)
    }

    /// Write one field as-is
    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Value of `field`, `None` if unset. The key field is not readable
    /// here; use [`Entity::key`] or [`Entity::id`].
    pub fn get(&self, field: &str) -> DbResult<Option<&Value>> {
        if field == T::KEY {
            return Err(DbError::Access(format!(
                "Cannot read key field `{}` of {} through get(); use id() or key() instead",
                T::KEY,
                T::NAME
            )));
        }
        Ok(self.data.get(field))
    }

    /// Remove `field` and return its value
    pub fn shift(&mut self, field: &str) -> Option<Value> {
        self.data.shift_remove(field)
    }

    /// HTML-escaped text of `field`, `None` if unset or `NULL`
    pub fn safe(&self, field: &str) -> Option<String> {
        self.data
            .get(field)
            .filter(|v| !v.is_null())
            .map(|v| escape(&v.to_string()))
    }

    /// The key as a collection key. Whole numbers become integers, other
    /// numbers keep their plain text form and anything else is HTML-escaped.
    pub fn id(&self) -> Option<Key> {
        let key = self.key.as_ref()?;
        if let Value::Integer(i) = key {
            return Some(Key::Int(*i));
        }

        let text = key.to_string();
        if !key.is_numeric() {
            return Some(Key::Str(escape(&text)));
        }
        match text.trim().parse::<i64>() {
            Ok(i) => Some(Key::Int(i)),
            Err(_) => Some(Key::Str(text.trim().to_string())),
        }
    }

    pub fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    /// Criteria selecting this entity's row
    pub fn key_filter(&self) -> Criteria {
        Criteria::by(T::KEY, self.key.clone().unwrap_or(Value::Null))
    }

    pub fn data(&self) -> &Fields {
        &self.data
    }

    pub fn exists(&self) -> bool {
        self.key.is_some()
    }

    pub fn is_new(&self) -> bool {
        self.key.is_none()
    }

    /// Insert a new entity or update a persisted one.
    ///
    /// Inserting fails with [`DbError::Data`] when there is no data. Under a
    /// UUID strategy the key is generated into the data before the insert,
    /// unless the data already has one.
    pub fn save(&mut self, db: &Database) -> DbResult<Saved> {
        if self.exists() {
            db.update(T::NAME, &self.data, &self.key_filter())?;
            return Ok(Saved::Updated(self.data.clone()));
        }

        if self.data.is_empty() {
            return Err(DbError::Data(format!(
                "Cannot insert into {}: entity has no data",
                T::NAME
            )));
        }

        if self.data.get(T::KEY).map_or(true, Value::is_null) {
            if let Some(generated) = T::key_strategy().generate() {
                self.data.insert(T::KEY.to_string(), generated);
            }
        }

        let rowid = db.insert(T::NAME, &self.data)?;
        let key = match self.data.get(T::KEY) {
            Some(value) if !value.is_null() => value.clone(),
            _ => Value::Integer(rowid),
        };

        debug!(table = T::NAME, key = %key, "Entity inserted");
        self.key = Some(key.clone());
        Ok(Saved::Inserted(key))
    }

    /// Insert, or update the row with the same key
    pub fn upsert(&self, db: &Database) -> DbResult<QueryResult> {
        let mut data = self.data.clone();
        if let Some(key) = &self.key {
            data.entry(T::KEY.to_string()).or_insert_with(|| key.clone());
        }
        db.upsert(T::NAME, &data)
    }

    /// Delete this entity's row. A new entity has no row; that returns 0.
    pub fn delete(&self, db: &Database) -> DbResult<usize> {
        if self.is_new() {
            debug!(table = T::NAME, "Skipping delete of unsaved entity");
            return Ok(0);
        }
        db.delete(T::NAME, &self.key_filter())
    }
}

impl Saved {
    /// Key of an inserted row
    pub fn inserted_key(&self) -> Option<&Value> {
        match self {
            Saved::Inserted(key) => Some(key),
            Saved::Updated(_) => None,
        }
    }
}

fn escape(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

fn checked_id<T: Table>(id: Value) -> DbResult<Value> {
    match id {
        Value::Integer(_) => Ok(id),
        Value::Text(ref s) if !s.trim().is_empty() => Ok(id),
        other => Err(DbError::Type(format!(
            "{}::load() expects integer or text ids, got {}",
            T::NAME,
            other.type_name()
        ))),
    }
}

fn index<T: Table>(entities: Vec<Entity<T>>, by_ids: bool) -> Collection<Entity<T>> {
    Collection::from_keyed(entities.into_iter().enumerate().map(|(i, entity)| {
        let key = if by_ids { entity.id() } else { None };
        (key.unwrap_or_else(|| Key::from(i)), entity)
    }))
}

impl<T: Table> fmt::Debug for Loaded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loaded::One(entity) => f.debug_tuple("One").field(entity).finish(),
            Loaded::Many(collection) => f.debug_tuple("Many").field(collection).finish(),
        }
    }
}

impl<T: Table> Default for Entity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Table> Clone for Entity<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            data: self.data.clone(),
            _table: PhantomData,
        }
    }
}

impl<T: Table> PartialEq for Entity<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.data == other.data
    }
}

impl<T: Table> fmt::Debug for Entity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("table", &T::NAME)
            .field("key", &self.key)
            .field("data", &self.data)
            .finish()
    }
}

impl<T: Table> fmt::Display for Entity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key.as_ref().map(Value::to_string).unwrap_or_default();
        writeln!(f, "{}({}):", T::NAME, key)?;
        for (field, value) in &self.data {
            writeln!(f, " [{}] {}", field, value)?;
        }
        Ok(())
    }
}

impl<T: Table> Columnar for Entity<T> {
    fn column_value(&self, column: &str) -> Option<Value> {
        if column == T::KEY {
            if let Some(key) = &self.key {
                return Some(key.clone());
            }
        }
        self.data.get(column).cloned()
    }
}
