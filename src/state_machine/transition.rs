//! Pure state transition function
//!
//! The whole routing table lives here. Given the same state and event
//! this function always produces the same result, with no I/O: the
//! catalog store and the transport are only ever touched through the
//! effects it returns.

use super::{ButtonAction, ChatState, Effect, Event, DEFAULT_NOTE_TITLE};
use crate::db::FileKind;
use crate::view;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Route one inbound event against the chat's current state.
///
/// Total by construction: every (state, event) pair has a defined row,
/// with mode mismatches landing in a guidance reply that leaves the
/// state untouched.
pub fn transition(state: &ChatState, event: Event) -> TransitionResult {
    match event {
        Event::Command { name } => transition_command(state, &name),
        Event::Button { action } => transition_button(action),
        Event::Text { body } => transition_text(state, &body),
        Event::File { file_ref, kind } => transition_file(state, file_ref, kind),
    }
}

fn transition_command(state: &ChatState, name: &str) -> TransitionResult {
    match name {
        "start" => TransitionResult::new(ChatState::Idle)
            .with_effect(Effect::Reply(view::home_menu())),
        // Unregistered commands fall through untouched, like a handler
        // that was never installed for them.
        _ => TransitionResult::new(state.clone()),
    }
}

/// Button rows never read the prior state: pressing any button abandons
/// a pending prompt, and only `add_lesson` / `upload|{id}` re-enter a
/// waiting state. Wholesale replacement is what keeps a stale lesson id
/// or half-typed title from resurfacing in an unrelated flow.
fn transition_button(action: ButtonAction) -> TransitionResult {
    match action {
        ButtonAction::Home => TransitionResult::new(ChatState::Idle)
            .with_effect(Effect::Reply(view::home_menu())),

        ButtonAction::ListLessons => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::ShowLessonList)
        }

        ButtonAction::AddLesson => TransitionResult::new(ChatState::AwaitingLessonName)
            .with_effect(Effect::Reply(view::prompt_lesson_name())),

        ButtonAction::ShowLesson(lesson_id) => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::ShowLesson { lesson_id })
        }

        ButtonAction::Upload(lesson_id) => {
            TransitionResult::new(ChatState::AwaitingNoteTitle { lesson_id })
                .with_effect(Effect::Reply(view::prompt_note_title()))
        }

        ButtonAction::ShowNote(note_id) => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::SendStoredNote { note_id })
        }

        ButtonAction::Unknown(token) => {
            tracing::debug!(token = %token, "Unrecognized button token");
            TransitionResult::new(ChatState::Idle)
        }
    }
}

fn transition_text(state: &ChatState, body: &str) -> TransitionResult {
    match state {
        ChatState::AwaitingLessonName => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::CreateLesson {
                name: body.trim().to_string(),
            })
        }

        ChatState::AwaitingNoteTitle { lesson_id } => {
            TransitionResult::new(ChatState::AwaitingNoteFile {
                lesson_id: *lesson_id,
                title: body.trim().to_string(),
            })
            .with_effect(Effect::Reply(view::prompt_note_file()))
        }

        ChatState::AwaitingNoteFile { .. } => TransitionResult::new(state.clone())
            .with_effect(Effect::Reply(view::send_file_guidance())),

        ChatState::Idle => TransitionResult::new(state.clone())
            .with_effect(Effect::Reply(view::menu_guidance())),
    }
}

fn transition_file(state: &ChatState, file_ref: String, kind: FileKind) -> TransitionResult {
    match state {
        // Title already captured.
        ChatState::AwaitingNoteFile { lesson_id, title } => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::CreateNote {
                lesson_id: *lesson_id,
                title: title.clone(),
                file_ref,
                kind,
            })
        }

        // The upload target is armed from the button press onward, so a
        // file that beats the title text still lands in the right lesson
        // under the placeholder title.
        ChatState::AwaitingNoteTitle { lesson_id } => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::CreateNote {
                lesson_id: *lesson_id,
                title: DEFAULT_NOTE_TITLE.to_string(),
                file_ref,
                kind,
            })
        }

        ChatState::Idle | ChatState::AwaitingLessonName => TransitionResult::new(state.clone())
            .with_effect(Effect::Reply(view::upload_target_guidance())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::FileKind;

    fn text_event(body: &str) -> Event {
        Event::Text {
            body: body.to_string(),
        }
    }

    fn file_event(file_ref: &str, kind: FileKind) -> Event {
        Event::File {
            file_ref: file_ref.to_string(),
            kind,
        }
    }

    fn button(action: ButtonAction) -> Event {
        Event::Button { action }
    }

    #[test]
    fn test_start_shows_home_menu_and_clears() {
        let result = transition(
            &ChatState::AwaitingNoteFile {
                lesson_id: 3,
                title: "half-done".to_string(),
            },
            Event::Command {
                name: "start".to_string(),
            },
        );

        assert_eq!(result.new_state, ChatState::Idle);
        assert!(matches!(result.effects.as_slice(), [Effect::Reply(_)]));
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let state = ChatState::AwaitingLessonName;
        let result = transition(
            &state,
            Event::Command {
                name: "help".to_string(),
            },
        );

        assert_eq!(result.new_state, state);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_add_lesson_then_name_creates_lesson() {
        let result = transition(&ChatState::Idle, button(ButtonAction::AddLesson));
        assert_eq!(result.new_state, ChatState::AwaitingLessonName);

        let result = transition(&result.new_state, text_event("  Calculus I  "));
        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::CreateLesson {
                name: "Calculus I".to_string()
            }]
        );
    }

    #[test]
    fn test_home_abandons_pending_lesson_name() {
        // add_lesson, then home before sending text: the later text must
        // be treated as out-of-context, not as a lesson name.
        let result = transition(&ChatState::AwaitingLessonName, button(ButtonAction::Home));
        assert_eq!(result.new_state, ChatState::Idle);

        let result = transition(&result.new_state, text_event("Calculus I"));
        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(result.effects, vec![Effect::Reply(crate::view::menu_guidance())]);
    }

    #[test]
    fn test_upload_flow_carries_title_into_note() {
        let result = transition(&ChatState::Idle, button(ButtonAction::Upload(7)));
        assert_eq!(result.new_state, ChatState::AwaitingNoteTitle { lesson_id: 7 });

        let result = transition(&result.new_state, text_event("Chapter 1"));
        assert_eq!(
            result.new_state,
            ChatState::AwaitingNoteFile {
                lesson_id: 7,
                title: "Chapter 1".to_string()
            }
        );

        let result = transition(&result.new_state, file_event("file-abc", FileKind::Document));
        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::CreateNote {
                lesson_id: 7,
                title: "Chapter 1".to_string(),
                file_ref: "file-abc".to_string(),
                kind: FileKind::Document,
            }]
        );
    }

    #[test]
    fn test_file_before_title_gets_placeholder() {
        let result = transition(
            &ChatState::AwaitingNoteTitle { lesson_id: 7 },
            file_event("file-abc", FileKind::Image),
        );

        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::CreateNote {
                lesson_id: 7,
                title: DEFAULT_NOTE_TITLE.to_string(),
                file_ref: "file-abc".to_string(),
                kind: FileKind::Image,
            }]
        );
    }

    #[test]
    fn test_file_without_upload_target_gets_guidance() {
        for state in [ChatState::Idle, ChatState::AwaitingLessonName] {
            let result = transition(&state, file_event("file-abc", FileKind::Document));
            assert_eq!(result.new_state, state);
            assert_eq!(
                result.effects,
                vec![Effect::Reply(crate::view::upload_target_guidance())]
            );
        }
    }

    #[test]
    fn test_text_while_awaiting_file_keeps_state() {
        let state = ChatState::AwaitingNoteFile {
            lesson_id: 2,
            title: "Chapter 1".to_string(),
        };
        let result = transition(&state, text_event("did you get it?"));

        assert_eq!(result.new_state, state);
        assert_eq!(
            result.effects,
            vec![Effect::Reply(crate::view::send_file_guidance())]
        );
    }

    #[test]
    fn test_any_button_resets_waiting_state() {
        let waiting = ChatState::AwaitingNoteFile {
            lesson_id: 1,
            title: "t".to_string(),
        };

        for (action, expected) in [
            (ButtonAction::Home, ChatState::Idle),
            (ButtonAction::ListLessons, ChatState::Idle),
            (ButtonAction::ShowLesson(4), ChatState::Idle),
            (ButtonAction::ShowNote(4), ChatState::Idle),
            (ButtonAction::AddLesson, ChatState::AwaitingLessonName),
            (
                ButtonAction::Upload(4),
                ChatState::AwaitingNoteTitle { lesson_id: 4 },
            ),
        ] {
            let result = transition(&waiting, button(action));
            assert_eq!(result.new_state, expected);
        }
    }

    #[test]
    fn test_unknown_token_resets_without_effects() {
        let result = transition(
            &ChatState::AwaitingLessonName,
            button(ButtonAction::Unknown("bogus|stuff".to_string())),
        );

        assert_eq!(result.new_state, ChatState::Idle);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_note_button_requests_stored_note() {
        let result = transition(&ChatState::Idle, button(ButtonAction::ShowNote(12)));
        assert_eq!(result.new_state, ChatState::Idle);
        assert_eq!(result.effects, vec![Effect::SendStoredNote { note_id: 12 }]);
    }

    #[test]
    fn test_empty_title_is_stored_verbatim() {
        // Whitespace-only titles trim to empty and are kept as typed; the
        // placeholder is only for uploads that never saw a title at all.
        let result = transition(
            &ChatState::AwaitingNoteTitle { lesson_id: 1 },
            text_event("   "),
        );
        assert_eq!(
            result.new_state,
            ChatState::AwaitingNoteFile {
                lesson_id: 1,
                title: String::new()
            }
        );
    }
}
