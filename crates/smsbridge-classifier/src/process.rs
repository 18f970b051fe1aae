//! Process-backed classifier
//!
//! Every call starts a fresh child process:
//!
//! ```text
//! <program> <args...> --text <text> --model <model>
//! ```
//!
//! Standard output is collected until exit and parsed as one JSON result
//! document; standard error is kept for diagnostics. A semaphore caps how many
//! children run at once, and callers beyond the cap wait for a permit.

use crate::classifier::Classifier;
use crate::config::InvokerConfig;
use crate::error::InvocationError;
use async_trait::async_trait;
use smsbridge_core::{ClassificationRequest, ClassificationResult};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Classifier that shells out to an external program per request
pub struct ProcessClassifier {
    config: InvokerConfig,
    permits: Semaphore,
}

impl ProcessClassifier {
    /// Create a new process classifier
    pub fn new(config: InvokerConfig) -> smsbridge_core::Result<Self> {
        config.validate()?;
        let permits = Semaphore::new(config.max_concurrent);
        Ok(Self { config, permits })
    }

    /// The configuration this classifier runs with
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Number of processes that could start right now without waiting
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    fn command(&self, request: &ClassificationRequest) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .arg("--text")
            .arg(&request.text)
            .arg("--model")
            .arg(&request.model)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = self.config.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }
}

#[async_trait]
impl Classifier for ProcessClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, InvocationError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| InvocationError::Spawn("classifier pool is closed".to_string()))?;

        let start = Instant::now();
        let child = self
            .command(request)
            .spawn()
            .map_err(|e| InvocationError::Spawn(format!("{}: {}", self.config.program, e)))?;
        debug!(pid = ?child.id(), model = %request.model, "Spawned classifier process");

        // Dropping the future on timeout drops the child, which kills it.
        let output = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    warn!(model = %request.model, "Classifier exceeded {:?}, killed", limit);
                    InvocationError::Timeout(limit)
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| InvocationError::Io(e.to_string()))?;

        debug!(
            code = ?output.status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Classifier process exited"
        );

        interpret_output(output.status.code(), &output.stdout, &output.stderr)
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}

/// Turn a finished process's exit code and streams into a result
///
/// Only an exit code of exactly 0 counts as success; `None` means the process
/// was killed by a signal.
pub fn interpret_output(
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<ClassificationResult, InvocationError> {
    let stderr = String::from_utf8_lossy(stderr).into_owned();

    if code != Some(0) {
        return Err(InvocationError::ProcessFailed { code, stderr });
    }

    let raw = String::from_utf8_lossy(stdout).into_owned();
    ClassificationResult::from_output(&raw).map_err(|e| InvocationError::MalformedOutput {
        reason: e.to_string(),
        raw,
        stderr,
    })
}
