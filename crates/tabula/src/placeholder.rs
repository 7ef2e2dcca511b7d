//! Named placeholder handling
//!
//! Statements use `:name` placeholders. Before a statement is prepared, every
//! placeholder bound to a [`Param::List`] is rewritten into one placeholder per
//! element, so `id IN :ids` with three ids runs as `id IN (:ids_0, :ids_1, :ids_2)`.
//! A placeholder already wrapped in its own parentheses (`IN (:ids)`) is
//! rewritten the same way without doubling them. Text inside quoted string
//! literals and quoted identifiers is never treated as a placeholder.

use crate::error::{DbError, DbResult};
use crate::value::{Param, Params, Value};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;

// Quoted literals and identifiers are matched first so their contents are skipped
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"'(?:[^']|'')*'|"(?:[^"]|"")*"|\(\s*:([A-Za-z_][A-Za-z0-9_]*)\s*\)|:([A-Za-z_][A-Za-z0-9_]*)"#,
    )
    .expect("placeholder pattern is valid")
});

/// Statement text and flat bindings ready for the driver
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expanded {
    pub sql: String,
    /// `(":name", value)` pairs
    pub binds: Vec<(String, Value)>,
}

/// Name of the `index`-th placeholder a list binding expands into
pub(crate) fn list_item_name(name: &str, index: usize) -> String {
    format!("{}_{}", name, index)
}

/// `(:name_0, :name_1, ...)`; `()` for an empty list
pub(crate) fn placeholder_list(name: &str, len: usize) -> String {
    let items: Vec<String> = (0..len)
        .map(|i| format!(":{}", list_item_name(name, i)))
        .collect();
    format!("({})", items.join(", "))
}

/// Rewrite list placeholders and flatten the bindings.
///
/// Fails when a list item name is also bound on its own (`ids` as a list and
/// `ids_0` as a value), since both would claim the same placeholder.
pub(crate) fn expand(sql: &str, params: &Params) -> DbResult<Expanded> {
    let sql = rewrite(sql, |name, parenthesized| match params.get(name)? {
        Param::List(values) => Some(placeholder_list(name, values.len())),
        Param::Value(_) if parenthesized => Some(format!("(:{})", name)),
        Param::Value(_) => None,
    });

    let mut binds = Vec::with_capacity(params.len());
    let mut seen = HashSet::new();
    let mut push = |bind: String, value: &Value| -> DbResult<()> {
        if !seen.insert(bind.clone()) {
            return Err(DbError::Query {
                code: None,
                message: format!("Placeholder {} is bound more than once", bind),
                sql: sql.clone(),
            });
        }
        binds.push((bind, value.clone()));
        Ok(())
    };

    for (name, param) in params.iter() {
        match param {
            Param::Value(value) => push(format!(":{}", name), value)?,
            Param::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    push(format!(":{}", list_item_name(name, i)), value)?;
                }
            }
        }
    }

    Ok(Expanded { sql, binds })
}

/// Substitute quoted literals for placeholders. For logs only: the output is
/// not injection safe and is never executed.
pub(crate) fn interpolate(sql: &str, params: &Params) -> String {
    rewrite(sql, |name, parenthesized| {
        let rendered = match params.get(name)? {
            Param::List(values) => {
                let literals: Vec<String> = values.iter().map(Value::to_sql_literal).collect();
                format!("({})", literals.join(", "))
            }
            Param::Value(value) if parenthesized => format!("({})", value.to_sql_literal()),
            Param::Value(value) => value.to_sql_literal(),
        };
        Some(rendered)
    })
}

/// Run `replace` over every placeholder. `None` keeps the original text.
fn rewrite<F>(sql: &str, mut replace: F) -> String
where
    F: FnMut(&str, bool) -> Option<String>,
{
    PLACEHOLDER
        .replace_all(sql, |caps: &Captures| {
            let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            let start = caps.get(0).map(|m| m.start()).unwrap_or_default();

            // `::` is a cast or a literal, not a placeholder
            if sql[..start].ends_with(':') {
                return whole.to_string();
            }

            let (name, parenthesized) = match (caps.get(1), caps.get(2)) {
                (Some(m), _) => (m.as_str(), true),
                (None, Some(m)) => (m.as_str(), false),
                (None, None) => return whole.to_string(),
            };

            replace(name, parenthesized).unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}
