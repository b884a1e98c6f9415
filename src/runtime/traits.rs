//! Trait abstractions for runtime I/O
//!
//! The transport seam: the router renders and decides, an implementation
//! of `ChatTransport` delivers. Also enables testing the router with a
//! recording mock.

use crate::db::FileKind;
use crate::state_machine::ChatId;
use crate::view::OutgoingMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failures at the transport boundary
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Chat platform rejected the request: {0}")]
    Api(String),
    #[error("Malformed transport payload: {0}")]
    Decode(String),
}

/// Outbound half of the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver a rendered message, buttons included
    async fn send_message(
        &self,
        chat: ChatId,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError>;

    /// Deliver a stored file by its transport-level reference
    async fn send_file(
        &self,
        chat: ChatId,
        file_ref: &str,
        kind: FileKind,
        caption: &str,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send_message(
        &self,
        chat: ChatId,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError> {
        (**self).send_message(chat, message).await
    }

    async fn send_file(
        &self,
        chat: ChatId,
        file_ref: &str,
        kind: FileKind,
        caption: &str,
    ) -> Result<(), TransportError> {
        (**self).send_file(chat, file_ref, kind, caption).await
    }
}
