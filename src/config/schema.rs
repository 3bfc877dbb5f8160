//! JSON Schema Generation
//!
//! Generates JSON Schema for roomrelay configuration validation.
//! Based on draft-07 of the JSON Schema specification.

use serde_json::json;
use serde_json::Value;

/// Generate the complete JSON schema for roomrelay configuration
pub fn generate_config_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Roomrelay Configuration",
        "description": "Configuration schema for the roomrelay room-request auto-responder",
        "type": "object",
        "properties": {
            "autoreply": generate_autoreply_schema(),
            "channel": generate_channel_schema(),
            "logging": generate_logging_schema(),
        },
        "required": ["autoreply", "channel"],
        "additionalProperties": false
    })
}

fn generate_autoreply_schema() -> Value {
    json!({
        "type": "object",
        "description": "Auto-reply behaviour and vacancy counter",
        "properties": {
            "numberOfVacantRooms": {
                "type": "integer",
                "minimum": 0,
                "description": "Rooms still available; rewritten after every granted request"
            },
            "chatGroupName": {
                "type": "string",
                "minLength": 1,
                "description": "Group chat to watch"
            },
            "baseCriteria": {
                "type": "string",
                "description": "Text a request must contain to be answered",
                "default": ""
            },
            "roomCategory": {
                "type": "string",
                "description": "Room category to count (case-insensitive)",
                "default": "ECONOMY"
            },
            "messageCheckIntervalMs": {
                "type": "integer",
                "minimum": 1,
                "description": "Poll interval in milliseconds",
                "default": 1000
            },
            "responseText": {
                "type": "string",
                "minLength": 1,
                "description": "Reply sent when rooms are granted"
            },
            "responseLimit": {
                "type": "integer",
                "minimum": 1,
                "description": "Maximum replies per response window",
                "default": 1
            },
            "responseWindowMinutes": {
                "type": "integer",
                "minimum": 0,
                "description": "Length of the response window in minutes",
                "default": 60
            },
            "isOptimistic": {
                "type": "boolean",
                "description": "Answer requests even when the criteria are not met",
                "default": false
            }
        },
        "required": ["numberOfVacantRooms", "chatGroupName", "responseText"]
    })
}

fn generate_channel_schema() -> Value {
    json!({
        "type": "object",
        "description": "File channel locations",
        "properties": {
            "inbox": {
                "type": "string",
                "description": "File holding inbound messages separated by '---' lines"
            },
            "outbox": {
                "type": "string",
                "description": "File replies are appended to"
            }
        },
        "required": ["inbox", "outbox"]
    })
}

fn generate_logging_schema() -> Value {
    json!({
        "type": "object",
        "description": "Logging configuration",
        "properties": {
            "level": {
                "type": "string",
                "description": "Filter directive (overridden by RUST_LOG)",
                "default": "info"
            },
            "format": {
                "type": "string",
                "enum": ["text", "json"],
                "default": "text"
            },
            "file": {
                "type": "string",
                "description": "Append logs to this file instead of stderr"
            }
        }
    })
}
