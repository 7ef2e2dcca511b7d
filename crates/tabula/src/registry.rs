//! Process-wide "latest connection" lookup
//!
//! Every [`Database::open`] records itself here. The record is weak: it
//! never keeps a connection open, and [`latest`] returns `None` once every
//! handle to the last-opened database has been dropped, even while the
//! process keeps running. Opening another database replaces the record; an
//! earlier database that is still open is not restored when the newer one
//! goes away. Code that needs a
//! connection should take a `&Database` parameter; this lookup is only a
//! convenience for call sites that cannot.

use crate::connection::{Database, Shared};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Weak;

static LATEST: Lazy<RwLock<Weak<Shared>>> = Lazy::new(|| RwLock::new(Weak::new()));

pub(crate) fn register(db: &Database) {
    *LATEST.write() = db.downgrade();
}

/// The most recently opened database, if any handle to it is still alive
pub fn latest() -> Option<Database> {
    LATEST.read().upgrade().map(Database::from_shared)
}
