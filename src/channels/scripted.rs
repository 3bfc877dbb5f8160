//! Scripted Channel
//!
//! In-memory channel fed from a queue of message snapshots. Each fetch pops
//! the next snapshot; once the queue drains the last one keeps being
//! returned, like a chat nobody has posted to since.

use super::{Channel, ChannelError, ChannelInfo, ChannelResult, ChannelStatus, MessageContent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug, Default)]
struct ScriptState {
    pending: VecDeque<Option<String>>,
    latest: Option<String>,
    current_chat: Option<String>,
    selections: Vec<String>,
    sent: Vec<String>,
}

/// Channel driven by a fixed script of inbound messages
#[derive(Debug)]
pub struct ScriptedChannel {
    chats: Vec<String>,
    state: Mutex<ScriptState>,
}

impl ScriptedChannel {
    /// Create a channel that knows the chats in `chats`
    pub fn new(chats: Vec<String>) -> Self {
        Self {
            chats,
            state: Mutex::new(ScriptState::default()),
        }
    }

    /// Open `name` without going through `select_chat`
    pub fn with_current_chat(self, name: impl Into<String>) -> Self {
        self.state.lock().current_chat = Some(name.into());
        self
    }

    /// Queue the next snapshot of the latest message
    pub fn push_message(&self, text: impl Into<String>) {
        self.state.lock().pending.push_back(Some(text.into()));
    }

    /// Queue a snapshot in which no message is visible
    pub fn push_empty(&self) {
        self.state.lock().pending.push_back(None);
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Chats opened through `select_chat`
    pub fn selections(&self) -> Vec<String> {
        self.state.lock().selections.clone()
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn info(&self) -> ChannelInfo {
        let state = self.state.lock();
        let status = if state.current_chat.is_some() {
            ChannelStatus::Connected
        } else {
            ChannelStatus::Disconnected
        };
        ChannelInfo::new("scripted", "Scripted channel", status)
    }

    async fn current_chat(&self) -> ChannelResult<Option<String>> {
        Ok(self.state.lock().current_chat.clone())
    }

    async fn select_chat(&self, name: &str) -> ChannelResult<()> {
        if !self.chats.iter().any(|c| c == name) {
            return Err(ChannelError::ChatNotFound(name.to_string()));
        }
        let mut state = self.state.lock();
        state.current_chat = Some(name.to_string());
        state.selections.push(name.to_string());
        Ok(())
    }

    async fn fetch_latest_message(&self) -> ChannelResult<Option<String>> {
        let mut state = self.state.lock();
        if state.current_chat.is_none() {
            return Err(ChannelError::NotConnected);
        }
        if let Some(next) = state.pending.pop_front() {
            state.latest = next;
        }
        Ok(state.latest.clone())
    }

    async fn send_message(&self, content: MessageContent) -> ChannelResult<()> {
        let mut state = self.state.lock();
        if state.current_chat.is_none() {
            return Err(ChannelError::NotConnected);
        }
        state.sent.push(content.as_text().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_replays_latest() {
        let channel = ScriptedChannel::new(vec!["group".into()]).with_current_chat("group");
        channel.push_message("one");
        channel.push_empty();
        channel.push_message("two");

        assert_eq!(channel.fetch_latest_message().await.unwrap(), Some("one".into()));
        assert_eq!(channel.fetch_latest_message().await.unwrap(), None);
        assert_eq!(channel.fetch_latest_message().await.unwrap(), Some("two".into()));
        assert_eq!(channel.fetch_latest_message().await.unwrap(), Some("two".into()));
    }

    #[tokio::test]
    async fn test_select_and_send() {
        let channel = ScriptedChannel::new(vec!["group".into()]);
        assert!(matches!(
            channel.send_message(MessageContent::Text("x".into())).await,
            Err(ChannelError::NotConnected)
        ));
        assert!(channel.select_chat("nope").await.is_err());

        channel.select_chat("group").await.unwrap();
        channel
            .send_message(MessageContent::Text("hello".into()))
            .await
            .unwrap();

        assert_eq!(channel.selections(), vec!["group".to_string()]);
        assert_eq!(channel.sent(), vec!["hello".to_string()]);
        assert_eq!(channel.info().status, ChannelStatus::Connected);
    }
}
