//! Channel Trait
//!
//! Defines the capability every chat surface provides to the dispatcher.

use super::ChannelInfo;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur in channel operations
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel not connected")]
    NotConnected,

    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("Message send failed: {0}")]
    SendFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Channel error: {0}")]
    Other(String),
}

/// Message content types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Plain text message
    Text(String),
}

impl MessageContent {
    /// Text body of the message
    pub fn as_text(&self) -> &str {
        match self {
            MessageContent::Text(text) => text,
        }
    }
}

/// Core channel trait
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get channel info
    fn info(&self) -> ChannelInfo;

    /// Name of the chat currently open, if any
    async fn current_chat(&self) -> ChannelResult<Option<String>>;

    /// Open the chat called `name`
    async fn select_chat(&self, name: &str) -> ChannelResult<()>;

    /// Most recent inbound message in the open chat
    async fn fetch_latest_message(&self) -> ChannelResult<Option<String>>;

    /// Send a message to the open chat
    async fn send_message(&self, content: MessageContent) -> ChannelResult<()>;
}

/// Type-erased channel for storage
pub type DynChannel = Arc<dyn Channel>;
