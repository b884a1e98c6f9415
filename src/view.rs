//! View renderer
//!
//! Pure mapping from application data to outgoing messages. No side
//! effects, no state: the router decides *what* to show, these functions
//! decide *how* it reads.

use crate::db::{Lesson, Note};
use crate::state_machine::ButtonAction;

/// A structured outgoing message: text body plus an optional grid of
/// labeled actions, each carrying a routing token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub keyboard: Option<Vec<Vec<Button>>>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// A single inline-keyboard button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: &ButtonAction) -> Self {
        Self {
            label: label.into(),
            token: action.token(),
        }
    }
}

/// Home menu: the two top-level actions
pub fn home_menu() -> OutgoingMessage {
    OutgoingMessage::with_keyboard(
        "Welcome to the lecture notes archive.\nPick an action below.",
        vec![
            vec![Button::new("List lessons", &ButtonAction::ListLessons)],
            vec![Button::new("Add a lesson", &ButtonAction::AddLesson)],
        ],
    )
}

/// Lesson list, one button per lesson. Zero lessons is a valid state and
/// gets its own message rather than an empty keyboard.
pub fn lesson_list(lessons: &[Lesson]) -> OutgoingMessage {
    if lessons.is_empty() {
        return OutgoingMessage::with_keyboard(
            "No lessons yet. Use \"Add a lesson\" from the main menu.",
            vec![vec![Button::new("Back", &ButtonAction::Home)]],
        );
    }

    let mut keyboard: Vec<Vec<Button>> = lessons
        .iter()
        .map(|lesson| vec![Button::new(&lesson.name, &ButtonAction::ShowLesson(lesson.id))])
        .collect();
    keyboard.push(vec![Button::new("Back", &ButtonAction::Home)]);

    OutgoingMessage::with_keyboard("Available lessons:", keyboard)
}

/// A single lesson: its notes, an upload button carrying the lesson id,
/// and a back button to the list.
pub fn lesson_view(lesson: &Lesson, notes: &[Note]) -> OutgoingMessage {
    let mut keyboard: Vec<Vec<Button>> = notes
        .iter()
        .map(|note| vec![Button::new(&note.title, &ButtonAction::ShowNote(note.id))])
        .collect();
    keyboard.push(vec![Button::new(
        "Upload a new note",
        &ButtonAction::Upload(lesson.id),
    )]);
    keyboard.push(vec![Button::new("Back", &ButtonAction::ListLessons)]);

    OutgoingMessage::with_keyboard(format!("Lesson: {}\nStored notes:", lesson.name), keyboard)
}

pub fn prompt_lesson_name() -> OutgoingMessage {
    OutgoingMessage::text("Send the name of the new lesson (e.g. \"Calculus I\"):")
}

pub fn prompt_note_title() -> OutgoingMessage {
    OutgoingMessage::text("Send a title for the note:")
}

pub fn prompt_note_file() -> OutgoingMessage {
    OutgoingMessage::text("Now send the note itself (a document or a photo):")
}

pub fn lesson_saved(name: &str) -> OutgoingMessage {
    OutgoingMessage::text(format!("Lesson \"{name}\" saved."))
}

pub fn note_saved() -> OutgoingMessage {
    OutgoingMessage::text("Note saved.")
}

/// Fallback for text that no prompt is waiting for
pub fn menu_guidance() -> OutgoingMessage {
    OutgoingMessage::text("Please use the menu. Send /start to see it.")
}

/// Text arrived while a file was expected
pub fn send_file_guidance() -> OutgoingMessage {
    OutgoingMessage::text("A file is expected here. Send the note as a document or a photo.")
}

/// A file arrived with no upload in progress
pub fn upload_target_guidance() -> OutgoingMessage {
    OutgoingMessage::text(
        "Pick a lesson first: open it from the lesson list, then press its upload button.",
    )
}

pub fn not_found() -> OutgoingMessage {
    OutgoingMessage::text("Not found.")
}

/// Uniform rendering for any error that escapes a handler
pub fn error(message: &str) -> OutgoingMessage {
    OutgoingMessage::text(format!("Something went wrong:\n{message}"))
}
