use clap::{Args, Parser, Subcommand};
use smsbridge_history::HistoryBackend;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "smsbridge")]
#[command(
    author,
    version,
    about = "Bridge HTTP and WebSocket clients to an external text classifier"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the bridge server
    Serve(ServeArgs),

    /// Send one text to a running bridge and print the result
    Send {
        /// Bridge base URL
        #[arg(short, long, default_value = "http://127.0.0.1:5000")]
        target: String,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,

        /// Text to classify
        text: String,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "smsbridge.yaml", env = "SMSBRIDGE_CONFIG")]
    pub config: String,

    /// Listen address
    #[arg(short, long, env = "SMSBRIDGE_ADDRESS")]
    pub address: Option<String>,

    /// Listen port
    #[arg(short, long, env = "SMSBRIDGE_PORT")]
    pub port: Option<u16>,

    /// Directory of static frontend files
    #[arg(long)]
    pub public_dir: Option<PathBuf>,

    /// Classifier program
    #[arg(long, env = "SMSBRIDGE_CLASSIFIER")]
    pub classifier: Option<String>,

    /// Argument placed before `--text`/`--model` (repeatable)
    #[arg(long = "classifier-arg", allow_hyphen_values = true)]
    pub classifier_args: Vec<String>,

    /// Maximum classifier processes running at once
    #[arg(long, env = "SMSBRIDGE_MAX_CONCURRENT")]
    pub max_concurrent: Option<usize>,

    /// Per-call classifier deadline in seconds (0 disables it)
    #[arg(long, env = "SMSBRIDGE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// History backend: none, memory, jsonl or redis
    #[arg(long, env = "SMSBRIDGE_HISTORY", value_parser = parse_backend)]
    pub history: Option<HistoryBackend>,

    /// History file for the jsonl backend
    #[arg(long, env = "SMSBRIDGE_HISTORY_PATH")]
    pub history_path: Option<PathBuf>,

    /// Redis URL for the redis backend
    #[arg(long, env = "SMSBRIDGE_REDIS_URL")]
    pub redis_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_backend(s: &str) -> Result<HistoryBackend, String> {
    s.parse()
}

/// Pretty-print a `/predict` reply; non-JSON bodies are returned verbatim
pub fn format_reply(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}
