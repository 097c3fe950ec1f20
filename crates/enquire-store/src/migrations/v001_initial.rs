//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `users`, `sessions`,
//! `newsletter_subscriptions`, and `inquiries`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    username   TEXT NOT NULL UNIQUE COLLATE NOCASE,
    email      TEXT NOT NULL,                 -- stored lower-case
    first_name TEXT NOT NULL DEFAULT '',
    last_name  TEXT NOT NULL DEFAULT '',
    is_staff   INTEGER NOT NULL DEFAULT 0,    -- boolean 0/1
    created_at TEXT NOT NULL                  -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Sessions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS sessions (
    token      TEXT PRIMARY KEY NOT NULL,     -- hex-encoded 32 random bytes
    user_id    INTEGER NOT NULL,
    created_at TEXT NOT NULL,

    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Newsletter subscriptions
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS newsletter_subscriptions (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,       -- stored lower-case
    subscribed_at TEXT NOT NULL,
    is_active     INTEGER NOT NULL DEFAULT 1
);

-- ----------------------------------------------------------------
-- Inquiries (contact form submissions)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS inquiries (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    subject     TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT 'general',
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    is_resolved INTEGER NOT NULL DEFAULT 0,
    resolved_by INTEGER,                      -- nullable FK -> users(id)
    resolved_at TEXT,

    FOREIGN KEY (resolved_by) REFERENCES users(id) ON DELETE SET NULL,
    CHECK ((is_resolved = 0 AND resolved_at IS NULL)
        OR (is_resolved = 1 AND resolved_at IS NOT NULL))
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
