//! Invocation and classification errors

use std::time::Duration;

/// Failure of a single external classifier invocation
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvocationError {
    /// The process could not be started
    #[error("failed to start classifier process: {0}")]
    Spawn(String),

    /// Output could not be collected from a running process
    #[error("failed to collect classifier output: {0}")]
    Io(String),

    /// The process exited unsuccessfully
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("classifier process failed: {}", failure_message(.code, .stderr))]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// The process exited 0 but its output was not a valid result document
    #[error("failed to parse classifier output: {reason}")]
    MalformedOutput {
        raw: String,
        stderr: String,
        reason: String,
    },

    /// The process did not finish within its deadline and was killed
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
}

impl InvocationError {
    /// Short diagnostic suitable for a client-facing message
    ///
    /// For a failed process this is its standard error, or the exit code
    /// when standard error was empty.
    pub fn message(&self) -> String {
        match self {
            Self::ProcessFailed { code, stderr } => failure_message(code, stderr),
            Self::MalformedOutput { .. } => "failed to parse classifier output".to_string(),
            other => other.to_string(),
        }
    }

    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spawn(_) => "spawn",
            Self::Io(_) => "io",
            Self::ProcessFailed { .. } => "process_failed",
            Self::MalformedOutput { .. } => "malformed_output",
            Self::Timeout(_) => "timeout",
        }
    }
}

fn failure_message(code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match code {
        Some(code) => format!("classifier exited with code {}", code),
        None => "classifier terminated by signal".to_string(),
    }
}

/// Error returned by [`crate::ClassificationService::classify`]
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The payload was rejected before any process was started
    #[error(transparent)]
    Rejected(#[from] smsbridge_core::Error),

    /// The external process failed
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_message_prefers_stderr() {
        let err = InvocationError::ProcessFailed {
            code: Some(1),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(err.message(), "boom");
        assert!(err.to_string().contains("boom"));

        let err = InvocationError::ProcessFailed {
            code: Some(3),
            stderr: String::new(),
        };
        assert_eq!(err.message(), "classifier exited with code 3");

        let err = InvocationError::ProcessFailed {
            code: None,
            stderr: "  ".to_string(),
        };
        assert_eq!(err.message(), "classifier terminated by signal");
    }

    #[test]
    fn test_kinds_and_messages() {
        let err = InvocationError::MalformedOutput {
            raw: "not-json".to_string(),
            stderr: String::new(),
            reason: "expected value".to_string(),
        };
        assert_eq!(err.kind(), "malformed_output");
        assert_eq!(err.message(), "failed to parse classifier output");

        let err = InvocationError::Timeout(Duration::from_secs(2));
        assert_eq!(err.kind(), "timeout");
        assert_eq!(err.message(), "classifier timed out after 2s");
    }
}
