use rusqlite::Connection;

use crate::error::ReunionResult;

/// Initialize the database schema. Creates the member table if it doesn't exist.
pub fn initialize(conn: &Connection) -> ReunionResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS family_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age_group TEXT NOT NULL CHECK (age_group IN ('ADULT', 'CHILD', 'INFANT')),
            parent_id INTEGER REFERENCES family_members(id) ON DELETE CASCADE,
            generation INTEGER NOT NULL DEFAULT 0 CHECK (generation >= 0),
            is_founder INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_family_members_parent ON family_members(parent_id);

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
