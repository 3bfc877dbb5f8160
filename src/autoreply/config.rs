//! Auto-reply Configuration
//!
//! Settings for answering room-availability requests in a single group chat.

use crate::rooms::DEFAULT_ROOM_CATEGORY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Auto-reply configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoReplyConfig {
    /// Rooms still available for booking
    pub number_of_vacant_rooms: u32,
    /// Name of the group chat to watch
    pub chat_group_name: String,
    /// Text a request must contain to be answered
    #[serde(default)]
    pub base_criteria: String,
    /// Room category to count (case-insensitive)
    #[serde(default = "default_room_category")]
    pub room_category: String,
    /// Poll interval in milliseconds
    #[serde(default = "default_check_interval_ms")]
    pub message_check_interval_ms: u64,
    /// Reply sent when rooms are granted
    pub response_text: String,
    /// Maximum replies per response window
    #[serde(default = "default_response_limit")]
    pub response_limit: u32,
    /// Length of the response window in minutes
    #[serde(default = "default_window_minutes")]
    pub response_window_minutes: u64,
    /// Answer requests even when the criteria are not met
    #[serde(default)]
    pub is_optimistic: bool,
}

fn default_room_category() -> String {
    DEFAULT_ROOM_CATEGORY.to_string()
}

fn default_check_interval_ms() -> u64 {
    1000
}

fn default_response_limit() -> u32 {
    1
}

fn default_window_minutes() -> u64 {
    60
}

impl Default for AutoReplyConfig {
    fn default() -> Self {
        Self {
            number_of_vacant_rooms: 0,
            chat_group_name: String::new(),
            base_criteria: String::new(),
            room_category: default_room_category(),
            message_check_interval_ms: default_check_interval_ms(),
            response_text: String::new(),
            response_limit: default_response_limit(),
            response_window_minutes: default_window_minutes(),
            is_optimistic: false,
        }
    }
}

impl AutoReplyConfig {
    /// Create a config for `chat_group_name` replying with `response_text`
    pub fn new(chat_group_name: impl Into<String>, response_text: impl Into<String>) -> Self {
        Self {
            chat_group_name: chat_group_name.into(),
            response_text: response_text.into(),
            ..Self::default()
        }
    }

    /// Set the vacancy counter
    pub fn with_vacant_rooms(mut self, rooms: u32) -> Self {
        self.number_of_vacant_rooms = rooms;
        self
    }

    /// Set the base criteria
    pub fn with_base_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.base_criteria = criteria.into();
        self
    }

    /// Set the room category
    pub fn with_room_category(mut self, category: impl Into<String>) -> Self {
        self.room_category = category.into();
        self
    }

    /// Set the response limit and window
    pub fn with_response_limit(mut self, limit: u32, window_minutes: u64) -> Self {
        self.response_limit = limit;
        self.response_window_minutes = window_minutes;
        self
    }

    /// Set optimistic mode
    pub fn optimistic(mut self, optimistic: bool) -> Self {
        self.is_optimistic = optimistic;
        self
    }

    /// Poll interval as a `Duration`
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.message_check_interval_ms)
    }

    /// Response window as a `chrono::Duration`
    pub fn response_window(&self) -> chrono::Duration {
        i64::try_from(self.response_window_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chat_group_name.trim().is_empty() {
            return Err("chatGroupName must not be empty".to_string());
        }
        if self.response_text.trim().is_empty() {
            return Err("responseText must not be empty".to_string());
        }
        if self.message_check_interval_ms == 0 {
            return Err("messageCheckIntervalMs must be greater than 0".to_string());
        }
        if self.response_limit == 0 {
            return Err("responseLimit must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AutoReplyConfig {
        AutoReplyConfig::new("Crew Hotels", "Noted, we can take them")
            .with_vacant_rooms(12)
            .with_base_criteria("NEW DELAYED")
    }

    #[test]
    fn test_builder() {
        let config = valid_config()
            .with_room_category("business")
            .with_response_limit(3, 30)
            .optimistic(true);

        assert_eq!(config.chat_group_name, "Crew Hotels");
        assert_eq!(config.number_of_vacant_rooms, 12);
        assert_eq!(config.room_category, "business");
        assert_eq!(config.response_limit, 3);
        assert_eq!(config.response_window_minutes, 30);
        assert!(config.is_optimistic);
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_group() {
        let config = AutoReplyConfig::new("  ", "ok");
        let err = config.validate().unwrap_err();
        assert!(err.contains("chatGroupName"));
    }

    #[test]
    fn test_validate_empty_response() {
        let config = AutoReplyConfig::new("group", "");
        assert!(config.validate().unwrap_err().contains("responseText"));
    }

    #[test]
    fn test_validate_zero_interval_and_limit() {
        let mut config = valid_config();
        config.message_check_interval_ms = 0;
        assert!(config.validate().unwrap_err().contains("messageCheckIntervalMs"));

        let config = valid_config().with_response_limit(0, 10);
        assert!(config.validate().unwrap_err().contains("responseLimit"));
    }

    #[test]
    fn test_response_window_is_in_minutes() {
        let config = valid_config().with_response_limit(1, 15);
        assert_eq!(config.response_window(), chrono::Duration::minutes(15));
        assert_eq!(config.check_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let raw = r#"{
            numberOfVacantRooms: 20,
            chatGroupName: "Crew Hotels",
            baseCriteria: "NEW DELAYED",
            responseText: "OK",
            isOptimistic: true,
        }"#;
        let config: AutoReplyConfig = json5::from_str(raw).unwrap();
        assert_eq!(config.number_of_vacant_rooms, 20);
        assert_eq!(config.room_category, "ECONOMY");
        assert_eq!(config.message_check_interval_ms, 1000);
        assert_eq!(config.response_limit, 1);
        assert!(config.is_optimistic);
    }

    #[test]
    fn test_missing_required_key_fails() {
        let raw = r#"{ chatGroupName: "g", responseText: "ok" }"#;
        let err = json5::from_str::<AutoReplyConfig>(raw).unwrap_err();
        assert!(err.to_string().contains("numberOfVacantRooms"));
    }

    #[test]
    fn test_wrong_type_fails() {
        let raw = r#"{ numberOfVacantRooms: "ten", chatGroupName: "g", responseText: "ok" }"#;
        assert!(json5::from_str::<AutoReplyConfig>(raw).is_err());
    }
}
