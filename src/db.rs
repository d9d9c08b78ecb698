// src/db.rs

use crate::error::{MlogError, Result};
use crate::models::{Log, LogId, NewLog, Tag, TagCount, TagId};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        message TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE CHECK (name <> '')
    );
    CREATE TABLE IF NOT EXISTS log_tags (
        log_id INTEGER NOT NULL REFERENCES logs(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags(id),
        PRIMARY KEY (log_id, tag_id)
    );
    CREATE INDEX IF NOT EXISTS idx_log_tags_tag ON log_tags(tag_id);
";

/// A transactional handle on the journal store.
///
/// A transaction is opened as soon as the session is created. Nothing written
/// through the session is visible to other connections until `commit`.
/// Dropping an uncommitted session rolls it back.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Opens the store at `path`, creating the file and schema when missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Session> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(|err| {
            error!("event=db_open module=db status=error mode=file error={}", err);
            MlogError::Storage(err)
        })?;
        info!("event=db_open module=db status=ok mode=file path={}", path.display());
        Session::bootstrap(conn)
    }

    /// Opens a throwaway store that lives as long as the session.
    pub fn open_in_memory() -> Result<Session> {
        let conn = Connection::open_in_memory()?;
        debug!("event=db_open module=db status=ok mode=memory");
        Session::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Session> {
        // foreign_keys is a no-op inside a transaction, so it goes first.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch("BEGIN DEFERRED;")?;
        Ok(Session { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Persists every pending change. On failure the transaction is rolled
    /// back before the error is returned.
    pub fn commit(self) -> Result<()> {
        if let Err(err) = self.conn.execute_batch("COMMIT;") {
            error!("event=db_commit module=db status=error error={}", err);
            if !self.conn.is_autocommit() {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK;") {
                    warn!(
                        "event=db_rollback module=db status=error error={}",
                        rollback_err
                    );
                }
            }
            return Err(MlogError::Storage(err));
        }
        debug!("event=db_commit module=db status=ok");
        Ok(())
    }

    /// Discards every pending change.
    pub fn rollback(self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK;")?;
        debug!("event=db_rollback module=db status=ok");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.conn.is_autocommit() {
            if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
                warn!("event=db_rollback module=db status=error error={}", err);
            }
        }
    }
}

/// Runs `f` inside a savepoint; a failure undoes everything `f` wrote.
pub(crate) fn atomically<T>(conn: &Connection, name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    conn.execute_batch(&format!("SAVEPOINT {name};"))?;
    match f() {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name};"))?;
            Ok(value)
        }
        Err(err) => {
            conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};"))?;
            Err(err)
        }
    }
}

/// Fixed-width UTC text, so string order matches time order.
pub(crate) fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_stored_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| MlogError::Integrity(format!("stored date '{}' is unreadable: {}", raw, err)))
}

/// Inserts a log and its tag associations.
pub fn insert_log(conn: &Connection, log: &NewLog) -> Result<LogId> {
    atomically(conn, "insert_log", || {
        conn.execute(
            "INSERT INTO logs (date, message) VALUES (?1, ?2)",
            params![format_timestamp(&log.date), log.message],
        )?;
        let id = conn.last_insert_rowid();
        for tag in log.tags() {
            attach_tag(conn, id, tag.id)?;
        }
        Ok(id)
    })
}

/// Point lookup of a log, tags included.
pub fn get_log(conn: &Connection, id: LogId) -> Result<Option<Log>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT date, message FROM logs WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    match row {
        Some((date, message)) => Ok(Some(build_log(conn, id, &date, message)?)),
        None => Ok(None),
    }
}

pub(crate) fn build_log(conn: &Connection, id: LogId, date: &str, message: String) -> Result<Log> {
    let date = parse_stored_timestamp(date)?;
    let tags = tags_for_log(conn, id)?;
    Ok(Log::from_parts(id, date, message, tags))
}

pub fn update_log_message(conn: &Connection, id: LogId, message: &str) -> Result<()> {
    let count = conn.execute(
        "UPDATE logs SET message = ?1 WHERE id = ?2",
        params![message, id],
    )?;
    if count == 0 {
        return Err(MlogError::NotFound(id));
    }
    Ok(())
}

/// Deletes a log and its associations. Tags are left alone.
pub fn delete_log(conn: &Connection, id: LogId) -> Result<usize> {
    atomically(conn, "delete_log", || {
        conn.execute("DELETE FROM log_tags WHERE log_id = ?1", [id])?;
        Ok(conn.execute("DELETE FROM logs WHERE id = ?1", [id])?)
    })
}

/// Adds one association; an existing one is kept as is.
pub fn attach_tag(conn: &Connection, log_id: LogId, tag_id: TagId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO log_tags (log_id, tag_id) VALUES (?1, ?2)",
        params![log_id, tag_id],
    )?;
    Ok(())
}

/// Drops every association of the log and attaches `tags` instead.
pub fn replace_log_tags(conn: &Connection, log_id: LogId, tags: &[Tag]) -> Result<()> {
    atomically(conn, "replace_log_tags", || {
        conn.execute("DELETE FROM log_tags WHERE log_id = ?1", [log_id])?;
        for tag in tags {
            attach_tag(conn, log_id, tag.id)?;
        }
        Ok(())
    })
}

pub fn tags_for_log(conn: &Connection, log_id: LogId) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name FROM tags t
         JOIN log_tags lt ON lt.tag_id = t.id
         WHERE lt.log_id = ?1
         ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map([log_id], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Every tag row with this exact name. More than one means the store is broken.
pub fn find_tags_by_name(conn: &Connection, name: &str) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare("SELECT id, name FROM tags WHERE name = ?1")?;
    let tags = stmt
        .query_map([name], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn insert_tag(conn: &Connection, name: &str) -> Result<Tag> {
    conn.execute("INSERT INTO tags (name) VALUES (?1)", [name])?;
    Ok(Tag {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Every tag with its log count, zero counts included.
pub fn tag_counts(conn: &Connection) -> Result<Vec<TagCount>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, COUNT(lt.log_id) FROM tags t
         LEFT JOIN log_tags lt ON lt.tag_id = t.id
         GROUP BY t.id, t.name
         ORDER BY t.name",
    )?;
    let counts = stmt
        .query_map([], |row| {
            let count: i64 = row.get(2)?;
            Ok(TagCount {
                tag: Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                },
                count: count as usize,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(counts)
}
