//! History configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which store backs the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    /// History disabled
    #[default]
    None,
    /// In-process memory, lost on restart
    Memory,
    /// JSON-lines file
    Jsonl,
    /// Redis list (requires the `redis-store` feature)
    Redis,
}

impl std::str::FromStr for HistoryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "memory" => Ok(Self::Memory),
            "jsonl" | "file" => Ok(Self::Jsonl),
            "redis" => Ok(Self::Redis),
            other => Err(format!(
                "unknown history backend '{}' (expected none, memory, jsonl or redis)",
                other
            )),
        }
    }
}

/// History store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Backend to use
    #[serde(default)]
    pub backend: HistoryBackend,

    /// File for the `jsonl` backend
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Connection URL for the `redis` backend
    #[serde(default)]
    pub url: Option<String>,

    /// List key for the `redis` backend
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::default(),
            path: default_path(),
            url: None,
            key: default_key(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data/history.jsonl")
}

fn default_key() -> String {
    "smsbridge:predictions".to_string()
}
