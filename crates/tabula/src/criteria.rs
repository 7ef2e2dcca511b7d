//! Criteria compiler
//!
//! Turns column filters into a parameterised boolean expression plus the
//! bindings it references.
//!
//! - no conditions compile to `1` (every row matches)
//! - a value compiles to `"col" = :col`
//! - `NULL` compiles to `"col" IS NULL` with no binding
//! - a list compiles to `"col" IN (:col_0, :col_1, ...)`
//! - raw expressions pass through unchanged; their bindings are supplied by
//!   the caller

use crate::placeholder::list_item_name;
use crate::value::{Fields, Param, Params, Value};
use std::collections::HashSet;
use std::fmt;

/// Operator joining the conditions of a [`Criteria`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    fn separator(self) -> &'static str {
        match self {
            Joiner::And => " AND ",
            Joiner::Or => " OR ",
        }
    }
}

impl fmt::Display for Joiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.separator().trim())
    }
}

/// One filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Equality with a value, or membership in a list
    Match { column: String, param: Param },
    /// A complete boolean expression, e.g. `name LIKE :pattern`
    Raw(String),
}

/// Filter used to build `WHERE` clauses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    conditions: Vec<Condition>,
    joiner: Joiner,
}

/// A compiled expression and the bindings its placeholders need
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Params,
}

impl Criteria {
    /// Empty criteria; matches every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias of [`Criteria::new`] that reads better at call sites that mean it
    pub fn all() -> Self {
        Self::default()
    }

    /// Single equality condition
    pub fn by(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().eq(column, value)
    }

    /// Raw expressions joined with `AND`
    pub fn expressions<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        expressions
            .into_iter()
            .fold(Self::new(), |criteria, expr| criteria.raw(expr))
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Match {
            column: column.into(),
            param: Param::Value(value.into()),
        });
        self
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.eq(column, Value::Null)
    }

    /// `column IN (...)`
    pub fn any_of<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.conditions.push(Condition::Match {
            column: column.into(),
            param: Param::List(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn raw(mut self, expression: impl Into<String>) -> Self {
        self.conditions.push(Condition::Raw(expression.into()));
        self
    }

    pub fn joined_by(mut self, joiner: Joiner) -> Self {
        self.joiner = joiner;
        self
    }

    pub fn joiner(&self) -> Joiner {
        self.joiner
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Compile into a boolean expression. `prefix` namespaces the generated
    /// placeholder names so one statement can hold several compiled parts.
    pub fn compile(&self, prefix: &str) -> Compiled {
        if self.conditions.is_empty() {
            return Compiled {
                sql: "1".to_string(),
                params: Params::new(),
            };
        }

        let mut names = PlaceholderNames::new(prefix);
        let mut params = Params::new();
        let mut parts = Vec::with_capacity(self.conditions.len());

        for condition in &self.conditions {
            match condition {
                Condition::Raw(expression) => parts.push(expression.clone()),
                Condition::Match { column, param } => {
                    let quoted = quote_ident(column);
                    match param {
                        Param::Value(Value::Null) => parts.push(format!("{} IS NULL", quoted)),
                        Param::Value(value) => {
                            let name = names.next(column);
                            parts.push(format!("{} = :{}", quoted, name));
                            params.insert(name, Param::Value(value.clone()));
                        }
                        Param::List(values) => {
                            let (nulls, values): (Vec<&Value>, Vec<&Value>) =
                                values.iter().partition(|v| v.is_null());

                            if values.is_empty() && !nulls.is_empty() {
                                parts.push(format!("{} IS NULL", quoted));
                                continue;
                            }

                            let mut items = Vec::with_capacity(values.len());
                            for (i, value) in values.iter().enumerate() {
                                let item = names.next(&list_item_name(column, i));
                                items.push(format!(":{}", item));
                                params.insert(item, Param::Value((*value).clone()));
                            }

                            let membership = format!("{} IN ({})", quoted, items.join(", "));
                            if nulls.is_empty() {
                                parts.push(membership);
                            } else {
                                parts.push(format!("({} OR {} IS NULL)", membership, quoted));
                            }
                        }
                    }
                }
            }
        }

        Compiled {
            sql: parts.join(self.joiner.separator()),
            params,
        }
    }
}

impl From<Fields> for Criteria {
    fn from(fields: Fields) -> Self {
        fields
            .into_iter()
            .fold(Criteria::new(), |criteria, (column, value)| criteria.eq(column, value))
    }
}

impl From<&Fields> for Criteria {
    fn from(fields: &Fields) -> Self {
        Criteria::from(fields.clone())
    }
}

/// Compile `"col" = :prefixcol` pairs for a `SET` clause. `NULL` is bound,
/// not rewritten, since assignment has no null-comparison problem.
pub(crate) fn assignments(fields: &Fields, prefix: &str) -> Compiled {
    let mut names = PlaceholderNames::new(prefix);
    let mut params = Params::new();
    let mut parts = Vec::with_capacity(fields.len());

    for (column, value) in fields {
        let name = names.next(column);
        parts.push(format!("{} = :{}", quote_ident(column), name));
        params.insert(name, Param::Value(value.clone()));
    }

    Compiled {
        sql: parts.join(", "),
        params,
    }
}

/// Quote an identifier for SQLite. Dotted names are quoted per segment.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Generates unique placeholder names from column names
pub(crate) struct PlaceholderNames<'a> {
    prefix: &'a str,
    used: HashSet<String>,
}

impl<'a> PlaceholderNames<'a> {
    pub(crate) fn new(prefix: &'a str) -> Self {
        Self {
            prefix,
            used: HashSet::new(),
        }
    }

    pub(crate) fn next(&mut self, column: &str) -> String {
        let mut base: String = column
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if base.is_empty() || base.starts_with(|c: char| c.is_ascii_digit()) {
            base.insert(0, '_');
        }
        let base = format!("{}{}", self.prefix, base);

        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}{}", base, suffix);
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
