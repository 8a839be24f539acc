//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - The key-value store backing the course/session snapshot
//! - Completed Pomodoro study blocks and their statistics

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kv::KeyValueStore;
use crate::error::StorageError;

/// Kind of study block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyKind {
    Focus,
    Break,
}

impl StudyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyKind::Focus => "focus",
            StudyKind::Break => "break",
        }
    }
}

impl std::str::FromStr for StudyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(StudyKind::Focus),
            "break" => Ok(StudyKind::Break),
            other => Err(format!("unknown study kind '{other}' (expected focus or break)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySessionRecord {
    pub id: i64,
    pub kind: String,
    pub course_id: Option<String>,
    pub duration_min: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StudyStats {
    pub total_sessions: u64,
    pub total_focus_min: u64,
    pub total_break_min: u64,
    pub completed_pomodoros: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
}

/// SQLite database at `<data_dir>/studyroom.db`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS study_sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                kind         TEXT NOT NULL,
                course_id    TEXT,
                duration_min INTEGER NOT NULL,
                started_at   TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_study_completed_at ON study_sessions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_study_course_id ON study_sessions(course_id);",
        )?;
        Ok(())
    }

    /// Get a raw value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a raw value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Record a completed study block.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_study_session(
        &self,
        kind: StudyKind,
        course_id: Option<&str>,
        duration_min: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO study_sessions (kind, course_id, duration_min, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                kind.as_str(),
                course_id,
                duration_min,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent study blocks first.
    pub fn recent_study_sessions(&self, limit: usize) -> Result<Vec<StudySessionRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, course_id, duration_min, started_at, completed_at
             FROM study_sessions
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(StudySessionRecord {
                id: row.get(0)?,
                kind: row.get(1)?,
                course_id: row.get(2)?,
                duration_min: row.get(3)?,
                started_at: parse_timestamp(&row.get::<_, String>(4)?),
                completed_at: parse_timestamp(&row.get::<_, String>(5)?),
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn study_stats_today(&self) -> Result<StudyStats, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM study_sessions
             WHERE completed_at >= ?1
             GROUP BY kind",
        )?;

        let mut stats = StudyStats::default();
        let rows = stmt.query_map(params![today_start()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        for row in rows {
            let (kind, count, minutes) = row?;
            stats.total_sessions += count;
            match kind.as_str() {
                "focus" => {
                    stats.completed_pomodoros += count;
                    stats.total_focus_min += minutes;
                    stats.today_sessions += count;
                    stats.today_focus_min += minutes;
                }
                "break" => {
                    stats.total_break_min += minutes;
                }
                _ => {}
            }
        }
        Ok(stats)
    }

    pub fn study_stats_all(&self) -> Result<StudyStats, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM study_sessions
             GROUP BY kind",
        )?;

        let mut stats = StudyStats::default();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        for row in rows {
            let (kind, count, minutes) = row?;
            stats.total_sessions += count;
            match kind.as_str() {
                "focus" => {
                    stats.completed_pomodoros += count;
                    stats.total_focus_min += minutes;
                }
                "break" => {
                    stats.total_break_min += minutes;
                }
                _ => {}
            }
        }

        let (today_sessions, today_focus_min) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM study_sessions
             WHERE kind = 'focus' AND completed_at >= ?1",
            params![today_start()],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.today_sessions = today_sessions;
        stats.today_focus_min = today_focus_min;

        Ok(stats)
    }

    /// Focus minutes per course, largest first. Unlinked blocks are skipped.
    pub fn focus_minutes_by_course(&self) -> Result<Vec<(String, u64)>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT course_id, COALESCE(SUM(duration_min), 0) AS minutes
             FROM study_sessions
             WHERE kind = 'focus' AND course_id IS NOT NULL
             GROUP BY course_id
             ORDER BY minutes DESC, course_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?)))?;
        let minutes = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(minutes)
    }
}

fn today_start() -> String {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    format!("{today}T00:00:00+00:00")
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

impl KeyValueStore for Database {
    fn load(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let Some(raw) = self.kv_get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Malformed {
                key: key.to_string(),
                source,
            })
    }

    fn save(&mut self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.kv_set(key, &value.to_string())?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.kv_delete(key)?;
        Ok(())
    }
}
