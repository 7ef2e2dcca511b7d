//! Primary-key strategies

use crate::value::Value;
use uuid::Uuid;

/// How an entity type gets its primary key on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// The store assigns the key (SQLite rowid / `INTEGER PRIMARY KEY`)
    #[default]
    AutoIncrement,
    /// Random UUID generated before the insert
    UuidV4,
    /// Time-ordered UUID generated before the insert
    UuidV7,
}

impl KeyStrategy {
    /// A fresh key, or `None` when the store assigns it
    pub fn generate(self) -> Option<Value> {
        match self {
            KeyStrategy::AutoIncrement => None,
            KeyStrategy::UuidV4 => Some(Value::Text(Uuid::new_v4().to_string())),
            KeyStrategy::UuidV7 => Some(Value::Text(Uuid::now_v7().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_of(value: Option<Value>) -> Option<usize> {
        let text = value?.as_str()?.to_string();
        Uuid::parse_str(&text).ok().map(|u| u.get_version_num())
    }

    #[test]
    fn test_autoincrement_generates_nothing() {
        assert_eq!(KeyStrategy::AutoIncrement.generate(), None);
        assert_eq!(KeyStrategy::default(), KeyStrategy::AutoIncrement);
    }

    #[test]
    fn test_uuid_versions() {
        assert_eq!(version_of(KeyStrategy::UuidV4.generate()), Some(4));
        assert_eq!(version_of(KeyStrategy::UuidV7.generate()), Some(7));
    }

    #[test]
    fn test_uuids_are_unique() {
        assert_ne!(KeyStrategy::UuidV4.generate(), KeyStrategy::UuidV4.generate());
        assert_ne!(KeyStrategy::UuidV7.generate(), KeyStrategy::UuidV7.generate());
    }
}
