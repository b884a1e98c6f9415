//! Effects produced by state transitions

use crate::db::FileKind;
use crate::view::OutgoingMessage;

/// Effects to be executed after a state transition.
///
/// The transition function stays pure: anything touching the catalog
/// store or the transport is described here and performed by the
/// runtime's effect executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send an already-rendered message (prompts, menus, guidance)
    Reply(OutgoingMessage),

    /// Query the catalog and send the lesson list
    ShowLessonList,

    /// Look up a lesson, list its notes, and send the lesson view
    ShowLesson { lesson_id: i64 },

    /// Create the lesson if absent and confirm to the user
    CreateLesson { name: String },

    /// Insert a note and confirm to the user
    CreateNote {
        lesson_id: i64,
        title: String,
        file_ref: String,
        kind: FileKind,
    },

    /// Look up a note and emit its stored file, title as caption
    SendStoredNote { note_id: i64 },
}
