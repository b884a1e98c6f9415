//! Database schema and types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS lessons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lesson_id INTEGER NOT NULL REFERENCES lessons(id),
    title TEXT NOT NULL,
    file_ref TEXT NOT NULL,
    kind TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notes_lesson ON notes(lesson_id);
";

/// A named category that notes are filed under. Names are unique,
/// case-sensitive as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    pub id: i64,
    pub name: String,
}

/// A stored file reference with a title, belonging to exactly one lesson.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub lesson_id: i64,
    pub title: String,
    /// Opaque transport-level identifier; resolving it to bytes is the
    /// transport's job.
    pub file_ref: String,
    pub kind: FileKind,
}

/// What kind of attachment a note's file reference points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Document,
    Image,
}

impl FileKind {
    /// Storage representation, matching the `notes.kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Image => "image",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = UnknownFileKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(FileKind::Document),
            "image" => Ok(FileKind::Image),
            other => Err(UnknownFileKind(other.to_string())),
        }
    }
}

/// Raised when a `notes.kind` column holds a value this build doesn't know.
#[derive(Debug, thiserror::Error)]
#[error("unknown file kind: {0}")]
pub struct UnknownFileKind(pub String);
