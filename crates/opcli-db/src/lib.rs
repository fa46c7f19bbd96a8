pub mod accounts;
pub mod schema;
pub mod settings;

use rusqlite::Connection;
use std::path::Path;

pub use accounts::RegisteredAccount;

pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    schema::initialize(&conn)?;
    Ok(conn)
}
