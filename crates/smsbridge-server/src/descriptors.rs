//! Static descriptors: available model names and the training metrics document

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// File extensions recognized as serialized models
const MODEL_EXTENSIONS: &[&str] = &["pkl", "joblib"];

/// Name reported when no model files are found
pub const FALLBACK_MODEL: &str = "model";

/// Failure to serve the metrics document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The document does not exist; carries the file name
    #[error("{0} not found")]
    NotFound(String),

    /// The document exists but could not be read or parsed
    #[error("failed to read {name}: {detail}")]
    Unreadable { name: String, detail: String },
}

/// List model names in `dir`
///
/// Names are the file stems of `*.pkl` / `*.joblib` files, sorted and
/// de-duplicated. An unreadable or empty directory yields [`FALLBACK_MODEL`].
pub async fn list_models(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();

    match tokio::fs::read_dir(dir).await {
        Ok(mut entries) => loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    if let Some(name) = model_name(&entry.path()) {
                        names.push(name);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Failed to read models directory entry: {}", e);
                    break;
                }
            }
        },
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "Models directory unreadable: {}", e);
        }
    }

    names.sort();
    names.dedup();

    if names.is_empty() {
        names.push(FALLBACK_MODEL.to_string());
    }
    names
}

fn model_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !MODEL_EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}

/// Read the metrics document, passed through as-is
pub async fn read_metrics(path: &Path) -> Result<Value, DescriptorError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DescriptorError::NotFound(name));
        }
        Err(e) => {
            return Err(DescriptorError::Unreadable {
                name,
                detail: e.to_string(),
            })
        }
    };

    serde_json::from_str(&content).map_err(|e| DescriptorError::Unreadable {
        name,
        detail: e.to_string(),
    })
}
