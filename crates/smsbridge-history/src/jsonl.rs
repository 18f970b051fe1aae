//! JSON-lines history store
//!
//! One record per line, appended in arrival order, so the file is
//! chronological and reads walk it backwards. File work runs on the blocking
//! pool.

use crate::error::StoreError;
use crate::record::HistoryRecord;
use crate::store::HistoryStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// History appended to a JSON-lines file
pub struct JsonlHistoryStore {
    path: PathBuf,
    writer: Arc<Mutex<BufWriter<File>>>,
}

impl JsonlHistoryStore {
    /// Open (or create) the history file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!("History file opened: {:?}", path);

        Ok(Self {
            path,
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
        })
    }

    /// Path of the history file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonlHistoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError> {
        let line = serde_json::to_string(&record)?;
        let writer = self.writer.clone();

        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut writer = writer.lock();
            writeln!(writer, "{}", line)?;
            writer.flush()?;
            Ok(())
        })
        .await?
    }

    async fn recent_first(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_newest(&path, limit)).await?
    }

    fn name(&self) -> &str {
        "jsonl"
    }
}

fn read_newest(path: &Path, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut newest = VecDeque::with_capacity(limit);

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<HistoryRecord>(&line) {
            Ok(record) => {
                if newest.len() == limit {
                    newest.pop_front();
                }
                newest.push_back(record);
            }
            Err(e) => {
                debug!("Skipping unreadable history line: {}", e);
            }
        }
    }

    Ok(newest.into_iter().rev().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smsbridge_core::ClassificationResult;
    use tempfile::TempDir;

    fn record(text: &str) -> HistoryRecord {
        HistoryRecord::new(ClassificationResult::new(text, 1), "default")
    }

    #[tokio::test]
    async fn test_append_and_read_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlHistoryStore::open(temp_dir.path().join("history.jsonl")).unwrap();

        for text in ["first", "second", "third"] {
            store.append(record(text)).await.unwrap();
        }

        let records = store.recent_first(200).await.unwrap();
        let inputs: Vec<_> = records.iter().map(|r| r.result.input.as_str()).collect();
        assert_eq!(inputs, vec!["third", "second", "first"]);

        let records = store.recent_first(1).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result.input, "third");

        assert!(store.recent_first(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reopen_keeps_existing_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("history.jsonl");

        {
            let store = JsonlHistoryStore::open(&path).unwrap();
            store.append(record("before restart")).await.unwrap();
        }

        let store = JsonlHistoryStore::open(&path).unwrap();
        store.append(record("after restart")).await.unwrap();

        let records = store.recent_first(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].result.input, "after restart");
        assert_eq!(records[1].result.input, "before restart");
    }

    #[tokio::test]
    async fn test_unreadable_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.jsonl");
        std::fs::write(&path, "garbage\n\n").unwrap();

        let store = JsonlHistoryStore::open(&path).unwrap();
        store.append(record("ok")).await.unwrap();

        let records = store.recent_first(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result.input, "ok");
    }
}
