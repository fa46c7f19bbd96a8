//! Identifiers of the accounts registered with this application, in
//! registration order. Session tokens are never stored here.

use rusqlite::{params, Connection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub id: String,
    pub position: i64,
    pub created_at: String,
}

pub fn list_accounts(conn: &Connection) -> rusqlite::Result<Vec<RegisteredAccount>> {
    let mut stmt = conn.prepare(
        "SELECT id, position, created_at FROM accounts ORDER BY position",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(RegisteredAccount {
            id: row.get(0)?,
            position: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;
    rows.collect()
}

pub fn list_account_ids(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT id FROM accounts ORDER BY position")?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect()
}

/// Append `id` to the list. Re-adding a known id keeps its original slot.
pub fn add_account_id(conn: &Connection, id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO accounts (id, position)
         VALUES (?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM accounts))",
        params![id],
    )?;
    Ok(())
}

pub fn delete_account_id(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute("DELETE FROM accounts WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn test_ids_keep_registration_order() {
        let conn = conn();
        add_account_id(&conn, "UUID-B").unwrap();
        add_account_id(&conn, "UUID-A").unwrap();
        add_account_id(&conn, "UUID-C").unwrap();

        assert_eq!(
            list_account_ids(&conn).unwrap(),
            vec!["UUID-B", "UUID-A", "UUID-C"]
        );
    }

    #[test]
    fn test_readd_is_ignored() {
        let conn = conn();
        add_account_id(&conn, "UUID-A").unwrap();
        add_account_id(&conn, "UUID-B").unwrap();
        add_account_id(&conn, "UUID-A").unwrap();

        let accounts = list_accounts(&conn).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, "UUID-A");
        assert_eq!(accounts[0].position, 1);
    }

    #[test]
    fn test_delete() {
        let conn = conn();
        add_account_id(&conn, "UUID-A").unwrap();

        assert!(delete_account_id(&conn, "UUID-A").unwrap());
        assert!(!delete_account_id(&conn, "UUID-A").unwrap());
        assert!(list_account_ids(&conn).unwrap().is_empty());
    }
}
