//! roomrelay library
//!
//! Answers room-availability requests posted in a group chat. The core is
//! [`rooms::extract_room_count`], which reads how many rooms a free-form
//! request asks for; around it sit the auto-reply engine that tracks the
//! vacancy counter, the channel abstraction, and the polling dispatcher.

pub mod autoreply;
pub mod channels;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod rooms;

pub use rooms::{extract_room_count, RoomCountExtractor};
