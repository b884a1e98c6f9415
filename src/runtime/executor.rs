//! Conversation router executor
//!
//! The effectful half of the router: loads session state, runs the pure
//! transition, replaces the state wholesale, then executes the returned
//! effects against the catalog store and the transport. Any error raised
//! while executing an effect is caught here, reported back to the chat
//! through the renderer's error view, and logged; it never takes the
//! process down.

use super::traits::{ChatTransport, TransportError};
use crate::db::{Database, DbError};
use crate::session::SessionStore;
use crate::state_machine::{transition, ChatId, Effect, Event};
use crate::view;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while executing an effect
#[derive(Error, Debug)]
pub enum RouterError {
    #[error(transparent)]
    Store(#[from] DbError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Routes inbound events for all chats
pub struct Router<T: ChatTransport> {
    db: Database,
    sessions: SessionStore,
    transport: Arc<T>,
}

impl<T: ChatTransport> Router<T> {
    pub fn new(db: Database, sessions: SessionStore, transport: Arc<T>) -> Self {
        Self {
            db,
            sessions,
            transport,
        }
    }

    /// Handle one inbound event for one chat, start to finish.
    ///
    /// The new state is stored before any effect runs, so a failed store
    /// call or send can never leave a stale prompt armed.
    pub async fn handle_event(&self, chat: ChatId, event: Event) {
        tracing::debug!(chat, event = ?event, "Routing event");

        let state = self.sessions.get(chat).await;
        let result = transition(&state, event);
        self.sessions.set(chat, result.new_state).await;

        for effect in result.effects {
            if let Err(e) = self.run_effect(chat, effect).await {
                tracing::error!(chat, error = %e, "Effect failed");
                let report = view::error(&e.to_string());
                if let Err(send_err) = self.transport.send_message(chat, &report).await {
                    tracing::warn!(chat, error = %send_err, "Could not report error to chat");
                }
            }
        }
    }

    async fn run_effect(&self, chat: ChatId, effect: Effect) -> Result<(), RouterError> {
        match effect {
            Effect::Reply(message) => {
                self.transport.send_message(chat, &message).await?;
            }

            Effect::ShowLessonList => {
                let lessons = self.db.list_lessons()?;
                self.transport
                    .send_message(chat, &view::lesson_list(&lessons))
                    .await?;
            }

            Effect::ShowLesson { lesson_id } => match self.db.get_lesson(lesson_id) {
                Ok(lesson) => {
                    let notes = self.db.list_notes(lesson_id)?;
                    self.transport
                        .send_message(chat, &view::lesson_view(&lesson, &notes))
                        .await?;
                }
                // A dangling lesson button is the user's news, not an error.
                Err(DbError::LessonNotFound(_)) => {
                    self.transport.send_message(chat, &view::not_found()).await?;
                }
                Err(e) => return Err(e.into()),
            },

            Effect::CreateLesson { name } => {
                let lesson_id = self.db.create_lesson_if_absent(&name)?;
                tracing::info!(chat, lesson_id, name = %name, "Lesson ensured");
                self.transport
                    .send_message(chat, &view::lesson_saved(&name))
                    .await?;
            }

            Effect::CreateNote {
                lesson_id,
                title,
                file_ref,
                kind,
            } => {
                let note_id = self.db.create_note(lesson_id, &title, &file_ref, kind)?;
                tracing::info!(chat, note_id, lesson_id, "Note stored");
                self.transport.send_message(chat, &view::note_saved()).await?;
            }

            Effect::SendStoredNote { note_id } => match self.db.get_note(note_id) {
                Ok(note) => {
                    self.transport
                        .send_file(chat, &note.file_ref, note.kind, &note.title)
                        .await?;
                }
                Err(DbError::NoteNotFound(_)) => {
                    self.transport.send_message(chat, &view::not_found()).await?;
                }
                Err(e) => return Err(e.into()),
            },
        }

        Ok(())
    }
}
