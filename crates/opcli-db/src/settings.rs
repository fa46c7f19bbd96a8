use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

/// Setting key for the credential-manager binary path.
pub const CMD_PATH: &str = "cmd_path";

/// Stored credential-manager binary, if one was ever set.
pub fn cmd_path(conn: &Connection) -> rusqlite::Result<Option<PathBuf>> {
    Ok(get(conn, CMD_PATH)?.map(PathBuf::from))
}

pub fn set_cmd_path(conn: &Connection, path: &Path) -> rusqlite::Result<()> {
    set(conn, CMD_PATH, &path.to_string_lossy())
}

pub fn get(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}
