//! Events that can occur in a conversation

use crate::db::FileKind;

/// Inbound events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A slash command, name without the leading `/`
    Command { name: String },

    /// An inline-keyboard button press, already parsed from its token
    Button { action: ButtonAction },

    /// A plain text message
    Text { body: String },

    /// A file attachment (document or photo)
    File { file_ref: String, kind: FileKind },
}

/// A parsed routing token.
///
/// Tokens are opaque strings carried by outgoing buttons and echoed back
/// verbatim on press: either a bare verb (`home`, `list_lessons`,
/// `add_lesson`) or `"<verb>|<id>"` with verb in `lesson`/`note`/`upload`
/// and a decimal store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Home,
    ListLessons,
    AddLesson,
    ShowLesson(i64),
    ShowNote(i64),
    Upload(i64),
    /// Anything that didn't parse; kept for logging
    Unknown(String),
}

impl ButtonAction {
    /// Parse a callback token. Never fails: unrecognized input becomes
    /// `Unknown`, which the transition table maps to a plain reset.
    pub fn parse(token: &str) -> ButtonAction {
        match token {
            "home" => return ButtonAction::Home,
            "list_lessons" => return ButtonAction::ListLessons,
            "add_lesson" => return ButtonAction::AddLesson,
            _ => {}
        }

        if let Some((verb, id)) = token.split_once('|') {
            if let Ok(id) = id.parse::<i64>() {
                match verb {
                    "lesson" => return ButtonAction::ShowLesson(id),
                    "note" => return ButtonAction::ShowNote(id),
                    "upload" => return ButtonAction::Upload(id),
                    _ => {}
                }
            }
        }

        ButtonAction::Unknown(token.to_string())
    }

    /// The token an outgoing button carries for this action.
    pub fn token(&self) -> String {
        match self {
            ButtonAction::Home => "home".to_string(),
            ButtonAction::ListLessons => "list_lessons".to_string(),
            ButtonAction::AddLesson => "add_lesson".to_string(),
            ButtonAction::ShowLesson(id) => format!("lesson|{id}"),
            ButtonAction::ShowNote(id) => format!("note|{id}"),
            ButtonAction::Upload(id) => format!("upload|{id}"),
            ButtonAction::Unknown(token) => token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_verbs() {
        assert_eq!(ButtonAction::parse("home"), ButtonAction::Home);
        assert_eq!(ButtonAction::parse("list_lessons"), ButtonAction::ListLessons);
        assert_eq!(ButtonAction::parse("add_lesson"), ButtonAction::AddLesson);
    }

    #[test]
    fn test_parse_id_carrying_tokens() {
        assert_eq!(ButtonAction::parse("lesson|3"), ButtonAction::ShowLesson(3));
        assert_eq!(ButtonAction::parse("note|17"), ButtonAction::ShowNote(17));
        assert_eq!(ButtonAction::parse("upload|1"), ButtonAction::Upload(1));
    }

    #[test]
    fn test_parse_malformed_tokens() {
        for token in ["", "lesson|", "lesson|x", "lesson|1|2", "bogus", "note"] {
            assert_eq!(
                ButtonAction::parse(token),
                ButtonAction::Unknown(token.to_string()),
                "token {token:?}"
            );
        }
    }
}
