//! Room-count extraction
//!
//! Pulls the number of requested rooms out of a free-form availability
//! request, preferring a count annotated with the configured room category.

pub mod extract;

pub use extract::{extract_room_count, RoomCountExtractor, DEFAULT_ROOM_CATEGORY};
