//! Configuration loading and persistence
//!
//! The config file is JSON5 with camelCase keys. It is also where the
//! vacancy counter lives between runs, so it is rewritten (atomically)
//! whenever rooms are granted.
//!
//! The rewrite goes through `serde_json`: the file comes back as plain
//! pretty-printed JSON, which is still valid JSON5. Comments, trailing
//! commas and unquoted keys in a hand-written file do not survive the first
//! granted request, although every key and value does.

pub mod schema;

use crate::autoreply::AutoReplyConfig;
use crate::channels::file::FileChannelConfig;
use crate::logging::LoggingConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "ROOMRELAY_CONFIG_PATH";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Auto-reply behaviour and the vacancy counter
    pub autoreply: AutoReplyConfig,

    /// File channel locations
    pub channel: FileChannelConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.autoreply.validate().map_err(ConfigError::Invalid)?;
        if self.channel.inbox == self.channel.outbox {
            return Err(ConfigError::Invalid(
                "channel inbox and outbox must be different files".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the config file path.
///
/// `$ROOMRELAY_CONFIG_PATH` wins; otherwise `<config dir>/roomrelay/config.json5`.
pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roomrelay")
        .join("config.json5")
}

/// Load and validate the config at `path`
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = parse_config(&read_raw(path)?, path)?;
    config.validate()?;
    Ok(config)
}

/// Load the config at `path` as an untyped JSON value
pub fn load_config_value(path: &Path) -> Result<Value, ConfigError> {
    parse_config(&read_raw(path)?, path)
}

fn read_raw(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config<T: serde::de::DeserializeOwned>(raw: &str, path: &Path) -> Result<T, ConfigError> {
    json5::from_str(raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write `value` as pretty JSON to `path`, replacing it atomically
pub fn write_config_file(path: &Path, value: &Value) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);
    {
        let mut file = fs::File::create(&tmp_path).map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
        file.write_all(b"\n").map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
    }
    fs::rename(&tmp_path, path).map_err(write_err)?;
    Ok(())
}

/// Persists the vacancy counter after rooms are granted
pub trait VacancyStore: Send + Sync {
    fn save_vacancy(&self, rooms: u32) -> Result<(), ConfigError>;
}

/// Vacancy store writing back into the config file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VacancyStore for ConfigStore {
    fn save_vacancy(&self, rooms: u32) -> Result<(), ConfigError> {
        let mut value = load_config_value(&self.path)?;
        let autoreply = value
            .get_mut("autoreply")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ConfigError::Invalid("missing autoreply section".to_string()))?;
        autoreply.insert("numberOfVacantRooms".to_string(), Value::from(rooms));
        write_config_file(&self.path, &value)?;
        tracing::debug!(path = %self.path.display(), rooms, "Saved vacancy counter");
        Ok(())
    }
}

/// Vacancy store that only remembers the values it was given
#[derive(Debug, Default)]
pub struct MemoryVacancyStore {
    saved: Mutex<Vec<u32>>,
}

impl MemoryVacancyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value saved, oldest first
    pub fn saved(&self) -> Vec<u32> {
        self.saved.lock().clone()
    }
}

impl VacancyStore for MemoryVacancyStore {
    fn save_vacancy(&self, rooms: u32) -> Result<(), ConfigError> {
        self.saved.lock().push(rooms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        // vacancy counter is rewritten by the dispatcher
        autoreply: {
            numberOfVacantRooms: 12,
            chatGroupName: "Crew Hotels",
            baseCriteria: "NEW DELAYED",
            responseText: "Noted",
            responseLimit: 2,
            responseWindowMinutes: 30,
        },
        channel: { inbox: "inbox.txt", outbox: "outbox.txt" },
        logging: { level: "debug", format: "json" },
    }"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.json5");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&write_sample(&dir)).unwrap();

        assert_eq!(config.autoreply.number_of_vacant_rooms, 12);
        assert_eq!(config.autoreply.chat_group_name, "Crew Hotels");
        assert_eq!(config.autoreply.response_limit, 2);
        assert_eq!(config.channel.inbox, PathBuf::from("inbox.txt"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json5")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json5");
        fs::write(&path, "{ autoreply: ").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json5");
        fs::write(&path, SAMPLE.replace("responseLimit: 2", "responseLimit: 0")).unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("responseLimit"));
    }

    #[test]
    fn test_same_inbox_and_outbox_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json5");
        fs::write(&path, SAMPLE.replace("outbox.txt", "inbox.txt")).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_vacancy_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir);
        let store = ConfigStore::new(&path);

        store.save_vacancy(7).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.autoreply.number_of_vacant_rooms, 7);
        assert_eq!(config.autoreply.base_criteria, "NEW DELAYED");
        assert_eq!(config.logging.level, "debug");
        assert!(!dir.path().join("config.json5.tmp").exists());
    }

    #[test]
    fn test_save_vacancy_rewrites_as_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(&dir);
        assert!(serde_json::from_str::<Value>(SAMPLE).is_err());

        ConfigStore::new(&path).save_vacancy(9).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("//"));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["autoreply"]["numberOfVacantRooms"], 9);
        assert_eq!(value["channel"]["outbox"], "outbox.txt");
    }

    #[test]
    fn test_write_config_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json5");

        write_config_file(&path, &serde_json::json!({ "a": 1 })).unwrap();
        assert_eq!(load_config_value(&path).unwrap()["a"], 1);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryVacancyStore::new();
        store.save_vacancy(5).unwrap();
        store.save_vacancy(3).unwrap();
        assert_eq!(store.saved(), vec![5, 3]);
    }
}
