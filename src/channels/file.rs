//! File Channel
//!
//! Reads requests from an inbox file and appends replies to an outbox file.
//! Messages in both files are separated by lines consisting solely of `---`.

use super::{Channel, ChannelError, ChannelInfo, ChannelResult, ChannelStatus, MessageContent};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Separator line between messages
pub const MESSAGE_SEPARATOR: &str = "---";

/// File channel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChannelConfig {
    /// File the chat's inbound messages are written to
    pub inbox: PathBuf,
    /// File replies are appended to
    pub outbox: PathBuf,
}

/// Channel backed by an inbox and an outbox file
#[derive(Debug)]
pub struct FileChannel {
    config: FileChannelConfig,
    chat_name: String,
    selected: Mutex<Option<String>>,
}

impl FileChannel {
    /// Create a file channel serving the chat called `chat_name`
    pub fn new(config: FileChannelConfig, chat_name: impl Into<String>) -> Self {
        Self {
            config,
            chat_name: chat_name.into(),
            selected: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Channel for FileChannel {
    fn info(&self) -> ChannelInfo {
        let status = if self.selected.lock().is_some() {
            ChannelStatus::Connected
        } else {
            ChannelStatus::Disconnected
        };
        ChannelInfo::new("file", self.config.inbox.display().to_string(), status)
    }

    async fn current_chat(&self) -> ChannelResult<Option<String>> {
        Ok(self.selected.lock().clone())
    }

    async fn select_chat(&self, name: &str) -> ChannelResult<()> {
        if name != self.chat_name {
            return Err(ChannelError::ChatNotFound(name.to_string()));
        }
        *self.selected.lock() = Some(name.to_string());
        tracing::info!(chat = %name, inbox = %self.config.inbox.display(), "Opened chat");
        Ok(())
    }

    async fn fetch_latest_message(&self) -> ChannelResult<Option<String>> {
        if self.selected.lock().is_none() {
            return Err(ChannelError::NotConnected);
        }
        match tokio::fs::read_to_string(&self.config.inbox).await {
            Ok(content) => Ok(latest_block(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn send_message(&self, content: MessageContent) -> ChannelResult<()> {
        if self.selected.lock().is_none() {
            return Err(ChannelError::NotConnected);
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.outbox)
            .await?;
        let block = format!("{}\n{}\n", content.as_text(), MESSAGE_SEPARATOR);
        file.write_all(block.as_bytes())
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;
        Ok(())
    }
}

/// Split `content` on separator lines and return the last non-blank block.
pub fn latest_block(content: &str) -> Option<String> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in content.lines() {
        if line.trim() == MESSAGE_SEPARATOR {
            blocks.push(Vec::new());
        } else if let Some(current) = blocks.last_mut() {
            current.push(line);
        }
    }

    blocks
        .into_iter()
        .rev()
        .map(|lines| lines.join("\n").trim().to_string())
        .find(|block| !block.is_empty())
}
