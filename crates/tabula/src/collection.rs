//! Ordered, countable result collections
//!
//! A [`Collection`] keeps elements in insertion order under a [`Key`]: the
//! element's position when built from a plain sequence, or an entity id when
//! entities are loaded by id. Besides ordinary iteration it carries a cursor
//! (`rewind`/`current`/`key`/`next`/`valid`) for callers that step through a
//! result and restart it.

use crate::value::{Key, Row, Value};
use indexmap::IndexMap;

/// Elements that expose named values, for [`Collection::get_column`]
pub trait Columnar {
    fn column_value(&self, column: &str) -> Option<Value>;
}

impl Columnar for Row {
    fn column_value(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl Columnar for crate::value::Fields {
    fn column_value(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

/// Ordered sequence of rows, entities or values
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: IndexMap<Key, T>,
    cursor: usize,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            cursor: 0,
        }
    }
}

impl<T> Collection<T> {
    /// Collection keyed by position
    pub fn new(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }

    /// Collection with explicit keys. A repeated key keeps the first
    /// position and the last value.
    pub fn from_keyed<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (Key, T)>,
    {
        Self {
            items: items.into_iter().collect(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Same as [`Collection::len`]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first().map(|(_, v)| v)
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last().map(|(_, v)| v)
    }

    /// Values of `column` from every element that has it, in order
    pub fn get_column(&self, column: &str) -> Collection<Value>
    where
        T: Columnar,
    {
        self.items
            .values()
            .filter_map(|item| item.column_value(column))
            .collect()
    }

    // Cursor

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get_index(self.cursor).map(|(_, v)| v)
    }

    pub fn key(&self) -> Option<&Key> {
        self.items.get_index(self.cursor).map(|(k, _)| k)
    }

    /// Advance the cursor and return the element it now points at
    pub fn next(&mut self) -> Option<&T> {
        if self.cursor < self.items.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// `false` once the cursor has moved past the last element
    pub fn valid(&self) -> bool {
        self.cursor < self.items.len()
    }

    // Indexed access

    pub fn get(&self, key: &Key) -> Option<&T> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    /// Element at a position, whatever its key
    pub fn get_at(&self, position: usize) -> Option<&T> {
        self.items.get_index(position).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.items.contains_key(key)
    }

    /// Insert or replace the element under `key`. Replacing keeps its position.
    pub fn set(&mut self, key: impl Into<Key>, item: T) -> Option<T> {
        self.items.insert(key.into(), item)
    }

    /// Append under the next free integer key
    pub fn push(&mut self, item: T) -> Key {
        let next = self
            .items
            .keys()
            .filter_map(|k| match k {
                Key::Int(i) => Some(*i + 1),
                Key::Str(_) => None,
            })
            .max()
            .unwrap_or(0);

        let key = Key::Int(next.max(0));
        self.items.insert(key.clone(), item);
        key
    }

    /// Remove the element under `key`, keeping the order of the rest
    pub fn unset(&mut self, key: &Key) -> Option<T> {
        let (index, _, item) = self.items.shift_remove_full(key)?;
        if index < self.cursor {
            self.cursor -= 1;
        }
        Some(item)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.items.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Key, &T)> {
        self.items.iter()
    }

    pub fn into_values(self) -> Vec<T> {
        self.items.into_values().collect()
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_keyed(iter.into_iter().enumerate().map(|(i, v)| (Key::from(i), v)))
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = indexmap::map::IntoValues<Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}
