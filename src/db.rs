//! Catalog store for lectern
//!
//! Provides persistence for lessons and the notes filed under them.

mod schema;

pub use schema::*;

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Lesson not found: {0}")]
    LessonNotFound(i64),
    #[error("Note not found: {0}")]
    NoteNotFound(i64),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Lesson Operations ====================

    /// Create a lesson with this exact name, or return the existing one's id.
    ///
    /// The insert-or-ignore runs under the connection lock, so concurrent
    /// callers racing on the same name both observe a single row.
    pub fn create_lesson_if_absent(&self, name: &str) -> DbResult<i64> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR IGNORE INTO lessons (name) VALUES (?1)",
            params![name],
        )?;

        let id = conn.query_row(
            "SELECT id FROM lessons WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// List all lessons in insertion order
    pub fn list_lessons(&self) -> DbResult<Vec<Lesson>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name FROM lessons ORDER BY id ASC")?;

        let rows = stmt.query_map([], |row| {
            Ok(Lesson {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get lesson by id
    pub fn get_lesson(&self, id: i64) -> DbResult<Lesson> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name FROM lessons WHERE id = ?1",
            params![id],
            |row| {
                Ok(Lesson {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::LessonNotFound(id),
            other => DbError::Sqlite(other),
        })
    }

    // ==================== Note Operations ====================

    /// Insert a note under a lesson and return its id.
    ///
    /// `lesson_id` is not re-checked here; the router only issues this call
    /// with an id it obtained from a rendered lesson button.
    pub fn create_note(
        &self,
        lesson_id: i64,
        title: &str,
        file_ref: &str,
        kind: FileKind,
    ) -> DbResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO notes (lesson_id, title, file_ref, kind) VALUES (?1, ?2, ?3, ?4)",
            params![lesson_id, title, file_ref, kind.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a lesson's notes in insertion order.
    /// An id that was never created yields an empty list, not an error.
    pub fn list_notes(&self, lesson_id: i64) -> DbResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, lesson_id, title, file_ref, kind
             FROM notes WHERE lesson_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![lesson_id], note_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get note by id
    pub fn get_note(&self, id: i64) -> DbResult<Note> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, lesson_id, title, file_ref, kind FROM notes WHERE id = ?1",
            params![id],
            note_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NoteNotFound(id),
            other => DbError::Sqlite(other),
        })
    }
}

fn note_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    let kind: String = row.get(4)?;
    let kind = kind.parse::<FileKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Note {
        id: row.get(0)?,
        lesson_id: row.get(1)?,
        title: row.get(2)?,
        file_ref: row.get(3)?,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_lesson_if_absent_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        let first = db.create_lesson_if_absent("Calculus I").unwrap();
        let second = db.create_lesson_if_absent("Calculus I").unwrap();

        assert_eq!(first, second);

        let lessons = db.list_lessons().unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].name, "Calculus I");
    }

    #[test]
    fn test_lesson_names_are_case_sensitive() {
        let db = Database::open_in_memory().unwrap();

        let a = db.create_lesson_if_absent("algebra").unwrap();
        let b = db.create_lesson_if_absent("Algebra").unwrap();

        assert_ne!(a, b);
        assert_eq!(db.list_lessons().unwrap().len(), 2);
    }

    #[test]
    fn test_list_lessons_insertion_order() {
        let db = Database::open_in_memory().unwrap();

        db.create_lesson_if_absent("Physics").unwrap();
        db.create_lesson_if_absent("Chemistry").unwrap();
        db.create_lesson_if_absent("Biology").unwrap();

        let names: Vec<_> = db
            .list_lessons()
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["Physics", "Chemistry", "Biology"]);
    }

    #[test]
    fn test_get_lesson_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_lesson(42), Err(DbError::LessonNotFound(42))));
    }

    #[test]
    fn test_create_and_get_note() {
        let db = Database::open_in_memory().unwrap();

        let lesson_id = db.create_lesson_if_absent("Calculus I").unwrap();
        let note_id = db
            .create_note(lesson_id, "Chapter 1", "file-abc", FileKind::Document)
            .unwrap();

        let note = db.get_note(note_id).unwrap();
        assert_eq!(note.lesson_id, lesson_id);
        assert_eq!(note.title, "Chapter 1");
        assert_eq!(note.file_ref, "file-abc");
        assert_eq!(note.kind, FileKind::Document);
    }

    #[test]
    fn test_list_notes_empty_for_unknown_lesson() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_notes(999).unwrap().is_empty());
    }

    #[test]
    fn test_list_notes_insertion_order() {
        let db = Database::open_in_memory().unwrap();

        let lesson_id = db.create_lesson_if_absent("Calculus I").unwrap();
        db.create_note(lesson_id, "Chapter 1", "f1", FileKind::Document)
            .unwrap();
        db.create_note(lesson_id, "Sketches", "f2", FileKind::Image)
            .unwrap();

        let titles: Vec<_> = db
            .list_notes(lesson_id)
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Chapter 1", "Sketches"]);
    }

    #[test]
    fn test_get_note_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_note(7), Err(DbError::NoteNotFound(7))));
    }

    #[test]
    fn test_open_on_disk_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lectern.db");

        {
            let db = Database::open(&path).unwrap();
            db.create_lesson_if_absent("Calculus I").unwrap();
        }

        // Reopening must find the existing row, not recreate the schema over it.
        let db = Database::open(&path).unwrap();
        let lessons = db.list_lessons().unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].name, "Calculus I");
    }
}
