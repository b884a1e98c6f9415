//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::{ChatTransport, TransportError};
use crate::db::FileKind;
use crate::state_machine::ChatId;
use crate::view::OutgoingMessage;
use async_trait::async_trait;
use std::sync::Mutex;

/// Everything a transport was asked to deliver, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        chat: ChatId,
        message: OutgoingMessage,
    },
    File {
        chat: ChatId,
        file_ref: String,
        kind: FileKind,
        caption: String,
    },
}

/// Recording transport; can be switched into a failing mode
pub struct MockTransport {
    sent: Mutex<Vec<Sent>>,
    fail: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    /// Make every subsequent send return a network error
    pub fn fail_sends(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Full delivery log, in order
    #[allow(dead_code)] // API completeness
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recent text message, if any
    pub fn last_message(&self) -> Option<OutgoingMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|s| match s {
                Sent::Message { message, .. } => Some(message.clone()),
                Sent::File { .. } => None,
            })
    }

    /// All delivered files as (file_ref, kind, caption)
    pub fn files_sent(&self) -> Vec<(String, FileKind, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|s| match s {
                Sent::File {
                    file_ref,
                    kind,
                    caption,
                    ..
                } => Some((file_ref.clone(), *kind, caption.clone())),
                Sent::Message { .. } => None,
            })
            .collect()
    }

    fn check_fail(&self) -> Result<(), TransportError> {
        if *self.fail.lock().unwrap() {
            return Err(TransportError::Network("mock transport down".to_string()));
        }
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(
        &self,
        chat: ChatId,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError> {
        self.check_fail()?;
        self.sent.lock().unwrap().push(Sent::Message {
            chat,
            message: message.clone(),
        });
        Ok(())
    }

    async fn send_file(
        &self,
        chat: ChatId,
        file_ref: &str,
        kind: FileKind,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.check_fail()?;
        self.sent.lock().unwrap().push(Sent::File {
            chat,
            file_ref: file_ref.to_string(),
            kind,
            caption: caption.to_string(),
        });
        Ok(())
    }
}
