//! Cross-database guard for the seed tables.
//!
//! The seed tables (`users`, `products`, `departments`) belong to the
//! default database. While any other database is active, SQL that
//! textually references one of those names is rejected before it reaches
//! the engine.
//!
//! This is a word-boundary text match, not identifier parsing: a column
//! literally named `users` in an unrelated table trips it too. That false
//! positive is an accepted tradeoff; tightening the match to true SQL
//! identifiers would change which queries are accepted and is deliberately
//! not done here.

use std::sync::LazyLock;

use regex::Regex;

use sql_workbench_core::SEED_TABLES;

static RESERVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(users|products|departments)\b").expect("reserved-table pattern")
});

/// Returns the first seed-table name the SQL references, if any.
pub(crate) fn find_reserved_reference(sql: &str) -> Option<&'static str> {
    let found = RESERVED.find(sql)?;
    let lower = found.as_str().to_ascii_lowercase();
    SEED_TABLES.iter().copied().find(|t| *t == lower)
}
