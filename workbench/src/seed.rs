//! Seed schema and data for the default database.
//!
//! The default database is bootstrapped with three tables and a fixed row
//! set so a fresh workbench has something to query. The whole batch runs
//! as one transaction: either the full seed lands or none of it does.

/// Introspection query the buffer resets to after bootstrap and switches.
pub(crate) const DEFAULT_QUERY: &str =
    "SELECT name FROM sqlite_master WHERE type='table'";

/// Display name of the default database record.
pub(crate) const DEFAULT_DATABASE_NAME: &str = "Default";

/// Seed batch: 3 departments, 4 users, 4 products.
pub(crate) const SEED_BATCH: &str = r#"
BEGIN;

CREATE TABLE departments (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    department_id INTEGER REFERENCES departments(id)
);

CREATE TABLE products (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    price REAL NOT NULL,
    stock INTEGER NOT NULL DEFAULT 0
);

INSERT INTO departments (id, name) VALUES
    (1, 'Engineering'),
    (2, 'Sales'),
    (3, 'Marketing');

INSERT INTO users (id, name, email, department_id) VALUES
    (1, 'Alice Johnson', 'alice@example.com', 1),
    (2, 'Bob Martinez', 'bob@example.com', 1),
    (3, 'Carol Chen', 'carol@example.com', 2),
    (4, 'David Okafor', 'david@example.com', 3);

INSERT INTO products (id, name, price, stock) VALUES
    (1, 'Laptop', 1299.99, 12),
    (2, 'Monitor', 349.5, 30),
    (3, 'Keyboard', 89.0, 45),
    (4, 'Desk Chair', 229.95, 8);

COMMIT;
"#;
