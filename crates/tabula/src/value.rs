//! Column values, bind parameters and rows

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::Serialize;
use std::fmt;

/// Format datetimes are bound and rendered with
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text that is empty or only whitespace
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }

    /// Integers, finite reals and text that parses as a finite number
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Integer(_) => true,
            Value::Real(r) => r.is_finite(),
            Value::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        }
    }

    /// SQL literal for debug output. Never executed.
    pub(crate) fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
                format!("X'{}'", hex)
            }
            other => format!("'{}'", other.to_string().replace('\'', "''")),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::DateTime(_) => "datetime",
            Value::Blob(_) => "blob",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Blob(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bool(b) => ToSqlOutput::Borrowed(ValueRef::Integer(*b as i64)),
            Value::DateTime(dt) => ToSqlOutput::from(dt.format(DATETIME_FORMAT).to_string()),
            Value::Blob(bytes) => ToSqlOutput::Borrowed(ValueRef::Blob(bytes)),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(r) => Value::Real(r),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(v as i64)
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A bound parameter: one value, or a list expanded into one placeholder per element
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    List(Vec<Value>),
}

impl From<Value> for Param {
    fn from(v: Value) -> Self {
        Param::Value(v)
    }
}

impl From<Vec<Value>> for Param {
    fn from(values: Vec<Value>) -> Self {
        Param::List(values)
    }
}

macro_rules! param_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Param {
                fn from(v: $t) -> Self {
                    Param::Value(Value::from(v))
                }
            }
        )*
    };
}

param_from_scalar!(i32, i64, u32, f64, bool, &str, String, DateTime<Utc>);

/// Ordered placeholder-name to parameter mapping
///
/// Names are stored without the leading `:`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(IndexMap<String, Param>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a single value
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, Param::Value(value.into()));
        self
    }

    /// Bind a list, expanded to `(:name_0, :name_1, ...)` at execution
    pub fn bind_list<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.insert(name, Param::List(values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, param: Param) {
        let name = name.into();
        let name = name.strip_prefix(':').map(str::to_string).unwrap_or(name);
        self.0.insert(name, param);
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.0.get(name)
    }

    /// Add every binding of `other`, replacing same-named ones
    pub fn extend(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Param)> {
        self.0.iter()
    }
}

impl<K: Into<String>, P: Into<Param>> FromIterator<(K, P)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, param) in iter {
            params.insert(name, param.into());
        }
        params
    }
}

/// Ordered column-to-value mapping used for inserts, updates and entity data
pub type Fields = IndexMap<String, Value>;

/// Build a [`Fields`] mapping from `column => value` pairs
///
/// ```
/// let fields = tabula::fields! { "movie_name" => "Alien", "year" => 1979 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => { $crate::Fields::new() };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert(::std::string::String::from($column), $crate::Value::from($value)); )+
        fields
    }};
}

/// One fetched result row. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(Fields);

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Value at a column position
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.0.get_index(index).map(|(_, v)| v)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<Fields> for Row {
    fn from(fields: Fields) -> Self {
        Row(fields)
    }
}

impl From<Row> for Fields {
    fn from(row: Row) -> Self {
        row.0
    }
}

/// Collection key: a position or an entity id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Int(i as i64)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}
