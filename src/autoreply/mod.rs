//! Auto-reply Module
//!
//! Answers room-availability requests while tracking the vacancy counter,
//! a per-window response limit, and which messages were already handled.

pub mod config;
pub mod engine;

pub use config::AutoReplyConfig;
pub use engine::{create_engine, message_digest, AutoReplyEngine, Decision, DispatchState, MatchContext};
