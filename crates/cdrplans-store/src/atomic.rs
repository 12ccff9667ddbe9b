//! Whole-document reads and atomic, monotonic writes.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::freshness::Freshness;
use crate::{StoreError, WriteOutcome};

/// Reads and parses a JSON document. `Ok(None)` when the file does not exist.
pub(crate) async fn read_document(path: &Path) -> Result<Option<Value>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Deserialize {
            path: path.display().to_string(),
            source,
        })
}

/// Freshness of whatever is at `path`. Unparseable documents are
/// [`Freshness::Unstamped`] so the next refresh overwrites them.
pub(crate) async fn read_freshness(path: &Path) -> Result<Freshness, StoreError> {
    match read_document(path).await {
        Ok(None) => Ok(Freshness::Absent),
        Ok(Some(doc)) => Ok(Freshness::of_document(&doc)),
        Err(StoreError::Deserialize { path, source }) => {
            tracing::warn!(path = %path, error = %source, "unreadable artifact treated as stale");
            Ok(Freshness::Unstamped)
        }
        Err(e) => Err(e),
    }
}

/// Writes `doc` to `path` unless the artifact already there carries a
/// timestamp newer than `stamp`.
pub(crate) async fn persist_stamped(
    path: PathBuf,
    doc: &Value,
    stamp: DateTime<Utc>,
) -> Result<WriteOutcome, StoreError> {
    if let Freshness::Stamped(existing) = read_freshness(&path).await? {
        if existing > stamp {
            tracing::debug!(
                path = %path.display(),
                existing = %existing,
                "newer artifact already on disk; skipping write"
            );
            return Ok(WriteOutcome::Superseded { existing });
        }
    }

    let bytes = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Serialize {
        path: path.display().to_string(),
        source,
    })?;
    write_atomic(path, bytes).await?;
    Ok(WriteOutcome::Written)
}

/// Writes `bytes` to a temp file beside `path`, syncs it, and renames it over
/// `path`. Readers see either the old document or the new one.
pub(crate) async fn write_atomic(path: PathBuf, bytes: Vec<u8>) -> Result<(), StoreError> {
    let join_path = path.clone();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, &bytes))
        .await
        .map_err(|e| StoreError::io(&join_path, std::io::Error::other(e)))?
}

fn write_atomic_blocking(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().ok_or_else(|| {
        StoreError::io(
            path,
            std::io::Error::new(ErrorKind::InvalidInput, "artifact path has no parent"),
        )
    })?;
    std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::freshness::parse_timestamp;

    #[tokio::test]
    async fn read_document_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let doc = read_document(&dir.path().join("nope.json")).await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn corrupt_document_is_unstamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{\"data\": [1, 2").unwrap();
        assert_eq!(read_freshness(&path).await.unwrap(), Freshness::Unstamped);
    }

    #[tokio::test]
    async fn write_atomic_creates_parent_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme").join("A1.json");
        write_atomic(path.clone(), b"{}".to_vec()).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("acme"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, ["A1.json"]);
    }

    #[tokio::test]
    async fn persist_stamped_never_moves_backwards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A1.json");
        let newer = parse_timestamp("2024-06-01T00:00:00Z").unwrap();
        let older = parse_timestamp("2024-05-01T00:00:00Z").unwrap();

        let doc = json!({"meta": {"lastDownloaded": "2024-06-01T00:00:00.000Z"}, "v": 2});
        assert_eq!(
            persist_stamped(path.clone(), &doc, newer).await.unwrap(),
            WriteOutcome::Written
        );

        let stale = json!({"meta": {"lastDownloaded": "2024-05-01T00:00:00.000Z"}, "v": 1});
        assert_eq!(
            persist_stamped(path.clone(), &stale, older).await.unwrap(),
            WriteOutcome::Superseded { existing: newer }
        );

        let on_disk: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["v"], json!(2));
    }

    #[tokio::test]
    async fn persist_stamped_same_instant_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A1.json");
        let at = parse_timestamp("2024-06-01T00:00:00Z").unwrap();

        persist_stamped(path.clone(), &json!({"meta": {"lastDownloaded": "2024-06-01T00:00:00.000Z"}, "v": 1}), at)
            .await
            .unwrap();
        let outcome = persist_stamped(
            path.clone(),
            &json!({"meta": {"lastDownloaded": "2024-06-01T00:00:00.000Z"}, "v": 2}),
            at,
        )
        .await
        .unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
    }
}
