//! SQLite persistence for save games.
//!
//! RULE: Only store.rs talks to the database. The engine produces and
//! consumes save payload strings; it never executes SQL.

use crate::error::GameResult;
use rusqlite::{params, Connection, OptionalExtension};

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Upsert the slot and append to its history.
    pub fn write_save(&self, slot: &str, payload: &str, saved_at: &str) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (slot, payload, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET
                 payload  = excluded.payload,
                 saved_at = excluded.saved_at",
            params![slot, payload, saved_at],
        )?;
        self.conn.execute(
            "INSERT INTO save_history (slot, payload, saved_at) VALUES (?1, ?2, ?3)",
            params![slot, payload, saved_at],
        )?;
        log::debug!("save written to slot '{slot}' at {saved_at}");
        Ok(())
    }

    pub fn read_save(&self, slot: &str) -> GameResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM save_slot WHERE slot = ?1",
                params![slot],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    /// True when a row was actually deleted. History is kept.
    pub fn delete_save(&self, slot: &str) -> GameResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM save_slot WHERE slot = ?1", params![slot])?;
        Ok(deleted > 0)
    }

    /// All slots with their last save time, most recent first.
    pub fn list_slots(&self) -> GameResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT slot, saved_at FROM save_slot ORDER BY saved_at DESC")?;
        let slots = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }
}
