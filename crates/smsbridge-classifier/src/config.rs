//! Invoker configuration

use serde::{Deserialize, Serialize};
use smsbridge_core::{Error, Result, DEFAULT_MODEL};
use std::path::PathBuf;
use std::time::Duration;

/// How the external classification process is started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Program to execute
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before `--text <text> --model <model>`
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum number of classifier processes running at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Per-call deadline in seconds (0 disables it)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Working directory for the process
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl InvokerConfig {
    /// Create a config that runs `program` with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            ..Default::default()
        }
    }

    /// Set the per-call deadline in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the concurrency limit
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Set the default model name
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Per-call deadline, if any
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Check the config can be used to start processes
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(Error::config("classifier program must not be empty"));
        }
        if self.max_concurrent == 0 {
            return Err(Error::config("classifier max_concurrent must be at least 1"));
        }
        if self.default_model.is_empty() {
            return Err(Error::config("classifier default_model must not be empty"));
        }
        Ok(())
    }
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            default_model: default_model(),
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            working_dir: None,
        }
    }
}

fn default_program() -> String {
    "python3".to_string()
}

fn default_args() -> Vec<String> {
    vec!["backend/predict.py".to_string()]
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_concurrent() -> usize {
    num_cpus::get().max(1)
}

fn default_timeout_secs() -> u64 {
    60
}
