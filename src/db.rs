use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key holding the JSON-encoded task collection.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the next id to hand out, so ids are never reused.
pub const NEXT_ID_KEY: &str = "nextTaskId";
/// Key holding the persisted active board name.
pub const ACTIVE_BOARD_KEY: &str = "activeBoard";
/// Key holding the sidebar visibility flag.
pub const SIDEBAR_KEY: &str = "showSideBar";
/// Key holding the selected theme.
pub const THEME_KEY: &str = "theme";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL CHECK(length(key) > 0),
    value TEXT NOT NULL
);
";

fn set_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("failed to open database {path}"))?;
    set_pragmas(&conn)?;
    Ok(conn)
}

pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    set_pragmas(&conn)?;
    init(&conn)?;
    Ok(conn)
}

pub fn contains(conn: &Connection, key: &str) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv WHERE key = ?1", [key], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

/// Read and decode the value stored under `key`. Missing keys yield `None`.
pub fn get<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;
    match raw {
        Some(text) => {
            let value = serde_json::from_str(&text)
                .with_context(|| format!("stored value for '{key}' is not valid"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

pub fn set<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        rusqlite::params![key, text],
    )?;
    Ok(())
}

pub fn remove(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
    Ok(())
}
