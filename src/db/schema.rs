//! Database schema and migrations for Keyhole.
//!
//! Migrations are applied sequentially when the database is opened.

/// Database migrations.
///
/// Each entry is a SQL script executed in order; the `schema_version`
/// table records which have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    user_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,   -- exact, case-sensitive
    password    TEXT NOT NULL,          -- Argon2 PHC string
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: server-side sessions
    r#"
CREATE TABLE sessions (
    token       TEXT PRIMARY KEY,
    user_id     INTEGER NOT NULL,
    username    TEXT NOT NULL,
    password    TEXT NOT NULL,
    created_at  INTEGER NOT NULL,       -- unix seconds
    expires_at  INTEGER NOT NULL        -- unix seconds
);

CREATE INDEX idx_sessions_expires_at ON sessions(expires_at);
"#,
];
