//! Whole-file JSON reads and atomic rewrites.

use bilim_error::{BilimResult, StorageError, StorageErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Reads and decodes `path`, or returns `None` when the file does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> BilimResult<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into());
        }
    };

    let value = serde_json::from_slice(&bytes).map_err(|e| {
        StorageError::new(StorageErrorKind::Corrupt(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    Ok(Some(value))
}

/// Encodes `value` and replaces `path` with it.
///
/// The data is written to a sibling temp file first and renamed over the
/// target, so a crash never leaves a half-written store behind.
pub(crate) async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> BilimResult<()> {
    let data = serde_json::to_vec_pretty(value)
        .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;

    tracing::trace!(path = %path.display(), size = data.len(), "Rewrote store file");
    Ok(())
}
