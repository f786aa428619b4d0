//! Local persistence for event groups.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::KalsyncResult;
use crate::event::{Event, Group};

/// Repository over the persisted event collection, keyed by group name.
///
/// Only whole-group reads and atomic replaces are exposed; partial updates
/// never reach the sync engine.
pub trait EventStore {
    /// Load a group by name. A group that was never saved is empty.
    fn load_group(&self, name: &str) -> KalsyncResult<Group>;

    /// Replace the stored group wholesale.
    fn replace_group(&mut self, group: &Group) -> KalsyncResult<()>;
}

/// SQLite-backed store.
///
/// The connection is owned by whoever opened it and closes on drop; there
/// is no process-wide handle.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> KalsyncResult<Self> {
        let conn = Connection::open(path)?;
        let store = SqliteStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> KalsyncResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> KalsyncResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS groups (
                name TEXT PRIMARY KEY,
                events TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl EventStore for SqliteStore {
    fn load_group(&self, name: &str) -> KalsyncResult<Group> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT events FROM groups WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        let events: Vec<Event> = match row {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        Ok(Group {
            name: name.to_string(),
            events,
        })
    }

    fn replace_group(&mut self, group: &Group) -> KalsyncResult<()> {
        let json = serde_json::to_string(&group.events)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO groups (name, events) VALUES (?1, ?2)",
            params![group.name, json],
        )?;
        tx.commit()?;
        debug!(group = %group.name, count = group.events.len(), "replaced stored group");
        Ok(())
    }
}
