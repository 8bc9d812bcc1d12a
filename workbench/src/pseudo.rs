//! Pseudo-command classification.
//!
//! The workbench accepts two convenience commands that are not SQL:
//! `SHOW TABLES` and `DESCRIBE <table>` (alias `DESC`). Both are rewritten
//! into catalog queries before reaching the engine. Matching is
//! case-insensitive and whitespace-normalized; anything else passes
//! through verbatim.

/// How an input string should reach the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rewrite {
    /// `SHOW TABLES` — list user-defined tables. Seed-table filtering for
    /// non-default databases happens on the returned rows, not in the SQL,
    /// so the rewritten text never references reserved names.
    ShowTables,
    /// `DESCRIBE <table>` — column introspection for one table.
    Describe(String),
    /// Plain SQL, forwarded unchanged.
    Passthrough,
}

/// Classifies a trimmed input string.
pub(crate) fn classify(sql: &str) -> Rewrite {
    let normalized = sql.trim().trim_end_matches(';');
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    match tokens.as_slice() {
        [show, tables]
            if show.eq_ignore_ascii_case("show") && tables.eq_ignore_ascii_case("tables") =>
        {
            Rewrite::ShowTables
        }
        [describe, table]
            if describe.eq_ignore_ascii_case("describe")
                || describe.eq_ignore_ascii_case("desc") =>
        {
            Rewrite::Describe(unquote(table))
        }
        _ => Rewrite::Passthrough,
    }
}

/// Catalog query behind `SHOW TABLES`: user tables only, engine-internal
/// catalog tables excluded.
pub(crate) fn show_tables_sql() -> &'static str {
    "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
}

/// Catalog query behind `DESCRIBE <table>`.
pub(crate) fn describe_sql(table: &str) -> String {
    format!("PRAGMA table_info('{}')", table.replace('\'', "''"))
}

/// Strips one level of `"…"`, `` `…` `` or `[…]` quoting from a table name.
fn unquote(name: &str) -> String {
    let trimmed = name.trim();
    let stripped = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .or_else(|| trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')));
    stripped.unwrap_or(trimmed).to_string()
}
