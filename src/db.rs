use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("campus.sqlite3");
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// One row per persisted collection (or the session object). Values are
/// whole JSON documents; the revision bumps on every rewrite so callers can
/// detect lost updates between read and write.
pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS collections(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;
    Ok(())
}

pub fn value_get(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let row = conn
        .query_row("SELECT value FROM collections WHERE key = ?", [key], |r| {
            r.get::<_, String>(0)
        })
        .optional()?;
    Ok(row)
}

/// Upserts the document and returns the new revision.
pub fn value_put(conn: &Connection, key: &str, value: &str) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO collections(key, value, revision)
         VALUES(?, ?, 1)
         ON CONFLICT(key) DO UPDATE SET
           value = excluded.value,
           revision = collections.revision + 1",
        (key, value),
    )?;
    let rev = conn.query_row(
        "SELECT revision FROM collections WHERE key = ?",
        [key],
        |r| r.get::<_, i64>(0),
    )?;
    Ok(rev)
}

pub fn value_delete(conn: &Connection, key: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM collections WHERE key = ?", [key])?;
    Ok(())
}

pub fn revision_of(conn: &Connection, key: &str) -> anyhow::Result<Option<i64>> {
    let row = conn
        .query_row(
            "SELECT revision FROM collections WHERE key = ?",
            [key],
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    Ok(row)
}
