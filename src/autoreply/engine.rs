//! Auto-reply Engine
//!
//! Decides, message by message, whether a room request gets an answer and
//! keeps the vacancy counter and response window in an explicit
//! [`DispatchState`] owned by the caller.

use super::config::AutoReplyConfig;
use crate::rooms::extract_room_count;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Context for a single inbound message
#[derive(Debug, Clone)]
pub struct MatchContext {
    /// Message text content
    pub message_text: String,
    /// When the message was observed
    pub received_at: DateTime<Utc>,
}

impl MatchContext {
    /// Create a new match context
    pub fn new(message_text: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            message_text: message_text.into(),
            received_at,
        }
    }

    /// Hex SHA-256 digest used to recognise messages already handled
    pub fn digest(&self) -> String {
        message_digest(&self.message_text)
    }
}

/// Outcome of running one message through the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Message was already handled
    Duplicate,
    /// Message does not look like a request we answer
    CriteriaUnmet,
    /// Response limit for the current window is used up
    RateLimited,
    /// No room count could be read from the message
    NoRoomsRequested,
    /// Not enough vacant rooms to cover the request
    InsufficientRooms { requested: u32, vacant: u32 },
    /// Rooms can be granted, send `text`. Nothing is committed until the
    /// caller reports the send through [`AutoReplyEngine::commit_reply`].
    Reply {
        text: String,
        requested: u32,
        remaining: u32,
    },
}

impl Decision {
    /// Whether this decision asks for a reply to be sent
    pub fn is_reply(&self) -> bool {
        matches!(self, Decision::Reply { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Duplicate => write!(f, "duplicate"),
            Decision::CriteriaUnmet => write!(f, "criteria unmet"),
            Decision::RateLimited => write!(f, "response limit reached"),
            Decision::NoRoomsRequested => write!(f, "no rooms requested"),
            Decision::InsufficientRooms { requested, vacant } => {
                write!(f, "insufficient rooms ({} requested, {} vacant)", requested, vacant)
            }
            Decision::Reply {
                requested,
                remaining,
                ..
            } => write!(f, "reply ({} granted, {} remaining)", requested, remaining),
        }
    }
}

/// Mutable state carried between loop iterations
#[derive(Debug, Clone, Default)]
pub struct DispatchState {
    vacant_rooms: u32,
    response_count: u32,
    window_started_at: Option<DateTime<Utc>>,
    processed: HashSet<String>,
}

impl DispatchState {
    /// Start with `vacant_rooms` available and an expired response window
    pub fn new(vacant_rooms: u32) -> Self {
        Self {
            vacant_rooms,
            ..Self::default()
        }
    }

    /// Rooms still available
    pub fn vacant_rooms(&self) -> u32 {
        self.vacant_rooms
    }

    /// Replies sent in the current window
    pub fn response_count(&self) -> u32 {
        self.response_count
    }

    /// Start of the current response window
    pub fn window_started_at(&self) -> Option<DateTime<Utc>> {
        self.window_started_at
    }

    /// Number of messages recorded as handled
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Whether a message digest has been handled
    pub fn is_processed(&self, digest: &str) -> bool {
        self.processed.contains(digest)
    }

    fn mark_processed(&mut self, digest: String) {
        self.processed.insert(digest);
    }
}

/// Auto-reply engine that turns messages into decisions
#[derive(Debug)]
pub struct AutoReplyEngine {
    config: RwLock<AutoReplyConfig>,
}

impl AutoReplyEngine {
    /// Create a new auto-reply engine
    pub fn new(config: AutoReplyConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Update the configuration
    pub fn update_config(&self, config: AutoReplyConfig) {
        let mut cfg = self.config.write();
        *cfg = config;
    }

    /// Get current configuration
    pub fn get_config(&self) -> AutoReplyConfig {
        self.config.read().clone()
    }

    /// Whether `text` looks like a request this engine answers
    pub fn meets_criteria(&self, text: &str) -> bool {
        let config = self.config.read();
        let upper = text.to_uppercase();
        let base = config.base_criteria.to_uppercase();
        let category = config.room_category.to_uppercase();

        if upper.contains(&base) && upper.contains(&category) {
            return true;
        }
        config.is_optimistic
    }

    /// Process a message, updating `state`.
    ///
    /// A [`Decision::Reply`] leaves the message unrecorded and the vacancy
    /// untouched; `remaining` is what [`commit_reply`](Self::commit_reply)
    /// will leave once the reply has gone out.
    pub fn process_message(&self, state: &mut DispatchState, ctx: &MatchContext) -> Decision {
        let digest = ctx.digest();
        if state.is_processed(&digest) {
            return Decision::Duplicate;
        }

        if !self.meets_criteria(&ctx.message_text) {
            return Decision::CriteriaUnmet;
        }

        let config = self.config.read();
        let now = ctx.received_at;

        let window_expired = match state.window_started_at {
            Some(started) => now - started > config.response_window(),
            None => true,
        };
        if window_expired {
            state.response_count = 0;
            state.window_started_at = Some(now);
        }

        if state.response_count >= config.response_limit {
            return Decision::RateLimited;
        }

        let requested = extract_room_count(&ctx.message_text, &config.room_category);
        state.mark_processed(digest);

        if requested == 0 {
            return Decision::NoRoomsRequested;
        }

        if state.vacant_rooms < requested {
            return Decision::InsufficientRooms {
                requested,
                vacant: state.vacant_rooms,
            };
        }

        Decision::Reply {
            text: config.response_text.clone(),
            requested,
            remaining: state.vacant_rooms - requested,
        }
    }

    /// Record a reply that was delivered: deduct `requested` rooms, count the
    /// response, restart the window and mark the message handled. Returns the
    /// rooms left.
    pub fn commit_reply(
        &self,
        state: &mut DispatchState,
        ctx: &MatchContext,
        requested: u32,
    ) -> u32 {
        state.vacant_rooms = state.vacant_rooms.saturating_sub(requested);
        state.response_count += 1;
        state.window_started_at = Some(ctx.received_at);
        state.mark_processed(ctx.digest());
        state.vacant_rooms
    }
}

/// Hex SHA-256 digest of a message body
pub fn message_digest(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)
}

/// Create a shared auto-reply engine
pub fn create_engine(config: AutoReplyConfig) -> Arc<AutoReplyEngine> {
    Arc::new(AutoReplyEngine::new(config))
}
