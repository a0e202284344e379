//! Append-only audit log and JSON snapshot files.
//!
//! Writes are best-effort by contract: callers log failures and move on,
//! so this adapter never needs retries or fsync guarantees.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::ports::{AuditSink, AuditSinkError};
use crate::domain::AuditEvent;

/// [`AuditSink`] writing timestamped lines to a log file and JSON
/// documents to a snapshot file.
#[derive(Clone)]
pub struct FileAuditSink {
    audit_path: PathBuf,
    snapshot_path: PathBuf,
}

impl FileAuditSink {
    /// Create a sink over the given paths. Call [`Self::ensure_files`]
    /// once at startup.
    pub fn new(audit_path: impl Into<PathBuf>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            audit_path: audit_path.into(),
            snapshot_path: snapshot_path.into(),
        }
    }

    /// Create parent directories and seed both files when missing.
    pub async fn ensure_files(&self) -> Result<(), AuditSinkError> {
        ensure_parent(&self.audit_path).await?;
        ensure_parent(&self.snapshot_path).await?;
        if fs::metadata(&self.audit_path).await.is_err() {
            fs::write(&self.audit_path, b"")
                .await
                .map_err(|err| AuditSinkError::io(err.to_string()))?;
        }
        if fs::metadata(&self.snapshot_path).await.is_err() {
            fs::write(&self.snapshot_path, b"[]")
                .await
                .map_err(|err| AuditSinkError::io(err.to_string()))?;
        }
        Ok(())
    }
}

async fn ensure_parent(path: &Path) -> Result<(), AuditSinkError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| AuditSinkError::io(err.to_string()))?;
        }
    }
    Ok(())
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditSinkError> {
        let line = format!("[{}] {event}\n", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.audit_path)
            .await
            .map_err(|err| AuditSinkError::io(err.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|err| AuditSinkError::io(err.to_string()))
    }

    async fn snapshot(&self, payload: &serde_json::Value) -> Result<(), AuditSinkError> {
        let bytes = serde_json::to_vec_pretty(payload)
            .map_err(|err| AuditSinkError::io(err.to_string()))?;
        fs::write(&self.snapshot_path, bytes)
            .await
            .map_err(|err| AuditSinkError::io(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sink_in(dir: &tempfile::TempDir) -> FileAuditSink {
        FileAuditSink::new(
            dir.path().join("files/audit.log"),
            dir.path().join("files/transactions.json"),
        )
    }

    #[tokio::test]
    async fn ensure_files_seeds_the_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = sink_in(&dir);
        sink.ensure_files().await.expect("ensure files");

        let snapshot = fs::read_to_string(dir.path().join("files/transactions.json"))
            .await
            .expect("snapshot exists");
        assert_eq!(snapshot, "[]");
        assert!(fs::metadata(dir.path().join("files/audit.log")).await.is_ok());
    }

    #[tokio::test]
    async fn record_appends_timestamped_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = sink_in(&dir);
        sink.ensure_files().await.expect("ensure files");

        sink.record(&AuditEvent::TransactionCreated {
            id: 1,
            user_id: 2,
            amount: dec!(10),
        })
        .await
        .expect("first append");
        sink.record(&AuditEvent::TransactionDeleted { id: 1 })
            .await
            .expect("second append");

        let log = fs::read_to_string(dir.path().join("files/audit.log"))
            .await
            .expect("log exists");
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("CREATE TX id=1 user=2 amount=10"));
        assert!(lines[1].ends_with("DELETE TX id=1"));
        assert!(lines[0].starts_with('['));
    }

    #[tokio::test]
    async fn snapshot_overwrites_the_previous_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = sink_in(&dir);
        sink.ensure_files().await.expect("ensure files");

        sink.snapshot(&serde_json::json!([{ "id": 1 }]))
            .await
            .expect("first snapshot");
        sink.snapshot(&serde_json::json!([{ "id": 2 }]))
            .await
            .expect("second snapshot");

        let snapshot = fs::read_to_string(dir.path().join("files/transactions.json"))
            .await
            .expect("snapshot exists");
        let value: serde_json::Value = serde_json::from_str(&snapshot).expect("valid JSON");
        assert_eq!(value[0]["id"], 2);
    }

    #[tokio::test]
    async fn record_fails_cleanly_when_the_path_is_a_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = FileAuditSink::new(dir.path(), dir.path().join("snap.json"));
        let error = sink
            .record(&AuditEvent::UserDeleted { id: 1 })
            .await
            .expect_err("directory path cannot be appended to");
        assert!(matches!(error, AuditSinkError::Io { .. }));
    }
}
