//! Chat channels
//!
//! A channel is the chat surface the dispatcher reads requests from and
//! answers on. The dispatcher only sees the [`Channel`] trait, so a browser
//! session, a file drop, or a test script can sit behind it.

mod r#trait;

pub mod file;
pub mod scripted;

use serde::{Deserialize, Serialize};

pub use file::FileChannel;
pub use r#trait::{Channel, ChannelError, ChannelResult, DynChannel, MessageContent};
pub use scripted::ScriptedChannel;

/// Channel connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    Connected,
    Disconnected,
}

/// Static description of a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel ID (e.g. "file")
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Current status
    pub status: ChannelStatus,
}

impl ChannelInfo {
    pub fn new(id: impl Into<String>, label: impl Into<String>, status: ChannelStatus) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status,
        }
    }
}
