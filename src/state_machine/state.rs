//! Conversation state types

/// Telegram chat identifier. Sessions are keyed by it; for the private
/// chats this bot targets it coincides with the user id.
pub type ChatId = i64;

/// Title given to a note when the file arrives before any title text.
pub const DEFAULT_NOTE_TITLE: &str = "untitled";

/// Per-chat conversation state
///
/// One value per chat, replaced wholesale on every transition. The
/// fields a step needs travel as payload of exactly that step, so a
/// stale lesson id or pending title cannot outlive its flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatState {
    /// At the menu, no pending prompt
    #[default]
    Idle,

    /// "Add lesson" pressed; the next text message is the lesson name
    AwaitingLessonName,

    /// Upload button pressed; the next text message is the note title
    AwaitingNoteTitle { lesson_id: i64 },

    /// Title captured; the next document or photo completes the upload
    AwaitingNoteFile { lesson_id: i64, title: String },
}

impl ChatState {
    /// The lesson an in-flight upload is targeting, if any.
    ///
    /// The target is armed from the upload button press onward, which is
    /// why a file sent before any title text still lands in the right
    /// lesson (with the placeholder title).
    pub fn upload_target(&self) -> Option<i64> {
        match self {
            ChatState::AwaitingNoteTitle { lesson_id }
            | ChatState::AwaitingNoteFile { lesson_id, .. } => Some(*lesson_id),
            ChatState::Idle | ChatState::AwaitingLessonName => None,
        }
    }

    /// Check if a prompt is currently pending
    #[allow(dead_code)] // State query utility
    pub fn is_waiting(&self) -> bool {
        !matches!(self, ChatState::Idle)
    }
}
