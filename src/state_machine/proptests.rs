//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::db::FileKind;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![
        Just(ChatState::Idle),
        Just(ChatState::AwaitingLessonName),
        any::<i64>().prop_map(|lesson_id| ChatState::AwaitingNoteTitle { lesson_id }),
        (any::<i64>(), "[a-zA-Z0-9 ]{0,30}")
            .prop_map(|(lesson_id, title)| ChatState::AwaitingNoteFile { lesson_id, title }),
    ]
}

fn arb_action() -> impl Strategy<Value = ButtonAction> {
    prop_oneof![
        Just(ButtonAction::Home),
        Just(ButtonAction::ListLessons),
        Just(ButtonAction::AddLesson),
        any::<i64>().prop_map(ButtonAction::ShowLesson),
        any::<i64>().prop_map(ButtonAction::ShowNote),
        any::<i64>().prop_map(ButtonAction::Upload),
        "[a-z|0-9]{0,16}".prop_map(ButtonAction::Unknown),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(|name| Event::Command { name }),
        arb_action().prop_map(|action| Event::Button { action }),
        "[a-zA-Z0-9 /|]{0,40}".prop_map(|body| Event::Text { body }),
        ("[A-Za-z0-9_-]{1,24}", prop_oneof![Just(FileKind::Document), Just(FileKind::Image)])
            .prop_map(|(file_ref, kind)| Event::File { file_ref, kind }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Every (state, event) pair has a defined row.
    #[test]
    fn transition_is_total(state in arb_state(), event in arb_event()) {
        let _ = transition(&state, event);
    }

    /// Button dispatch never reads the prior state: whatever was pending,
    /// the landing state depends on the action alone.
    #[test]
    fn buttons_land_independent_of_prior_state(
        before in arb_state(),
        other in arb_state(),
        action in arb_action(),
    ) {
        let a = transition(&before, Event::Button { action: action.clone() });
        let b = transition(&other, Event::Button { action });
        prop_assert_eq!(a.new_state, b.new_state);
    }

    /// Only the two prompt-entering buttons leave the chat waiting.
    #[test]
    fn only_prompt_buttons_enter_waiting_states(
        state in arb_state(),
        action in arb_action(),
    ) {
        let result = transition(&state, Event::Button { action: action.clone() });
        match action {
            ButtonAction::AddLesson => {
                prop_assert_eq!(result.new_state, ChatState::AwaitingLessonName);
            }
            ButtonAction::Upload(lesson_id) => {
                prop_assert_eq!(result.new_state, ChatState::AwaitingNoteTitle { lesson_id });
            }
            _ => prop_assert_eq!(result.new_state, ChatState::Idle),
        }
    }

    /// Tokens round-trip through parse for every encodable action.
    #[test]
    fn tokens_round_trip(action in arb_action()) {
        // Unknown holds arbitrary text, which may legitimately re-parse
        // as a real action; every other variant must survive intact.
        if !matches!(action, ButtonAction::Unknown(_)) {
            prop_assert_eq!(ButtonAction::parse(&action.token()), action);
        }
    }

    /// Files only ever turn into notes while an upload target is armed,
    /// and always into the lesson the target names.
    #[test]
    fn notes_only_created_under_an_upload_target(
        state in arb_state(),
        file_ref in "[A-Za-z0-9_-]{1,24}",
    ) {
        let result = transition(&state, Event::File { file_ref, kind: FileKind::Document });
        let created = result.effects.iter().find_map(|e| match e {
            Effect::CreateNote { lesson_id, .. } => Some(*lesson_id),
            _ => None,
        });
        prop_assert_eq!(created, state.upload_target());
    }
}
