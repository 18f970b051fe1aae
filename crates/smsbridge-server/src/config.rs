//! Bridge configuration

use crate::cli::ServeArgs;
use serde::{Deserialize, Serialize};
use smsbridge_classifier::InvokerConfig;
use smsbridge_history::HistoryConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level configuration, loaded from YAML with CLI overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Listener and HTTP settings
    #[serde(default)]
    pub server: ServerConfig,

    /// External classifier process
    #[serde(default)]
    pub classifier: InvokerConfig,

    /// Optional history store
    #[serde(default)]
    pub history: HistoryConfig,

    /// Model list and metrics document locations
    #[serde(default)]
    pub descriptors: DescriptorConfig,
}

impl BridgeConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, args: &ServeArgs) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(args);
        config.classifier.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides
    pub fn apply_overrides(&mut self, args: &ServeArgs) {
        if let Some(address) = &args.address {
            self.server.address = address.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(dir) = &args.public_dir {
            self.server.public_dir = dir.clone();
        }

        if let Some(program) = &args.classifier {
            self.classifier.program = program.clone();
        }
        if !args.classifier_args.is_empty() {
            self.classifier.args = args.classifier_args.clone();
        }
        if let Some(max) = args.max_concurrent {
            self.classifier.max_concurrent = max;
        }
        if let Some(secs) = args.timeout_secs {
            self.classifier.timeout_secs = secs;
        }

        if let Some(backend) = args.history {
            self.history.backend = backend;
        }
        if let Some(path) = &args.history_path {
            self.history.path = path.clone();
        }
        if let Some(url) = &args.redis_url {
            self.history.url = Some(url.clone());
        }
    }
}

/// Listener and HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_address")]
    pub address: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for unmatched routes
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.address, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            public_dir: default_public_dir(),
            cors_origins: Vec::new(),
        }
    }
}

/// Locations of the static descriptor files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// Directory scanned for `*.pkl` / `*.joblib` model files
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Precomputed training metrics document
    #[serde(default = "default_metrics_file")]
    pub metrics_file: PathBuf,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            metrics_file: default_metrics_file(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./backend/public")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_metrics_file() -> PathBuf {
    PathBuf::from("./metrics.json")
}
