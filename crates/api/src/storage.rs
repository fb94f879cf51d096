//! Local-disk storage for uploaded documents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pathway_core::documents::stored_filename;
use pathway_core::types::DbId;

/// Writes uploads under a single root directory, one flat file per upload.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist an upload and return the path it was written to.
    ///
    /// The root directory is created on first use.
    pub async fn save(
        &self,
        user_id: DbId,
        uploaded_at: DateTime<Utc>,
        filename: &str,
        data: &[u8],
    ) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self
            .root
            .join(stored_filename(user_id, uploaded_at, filename));
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }

    /// Remove a stored file. A missing file or a failed delete is logged and
    /// otherwise ignored.
    pub async fn remove(&self, path: &str) {
        let path = Path::new(path);
        if !path.starts_with(&self.root) {
            tracing::warn!(path = %path.display(), "Refusing to delete file outside upload directory");
            return;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete stored document");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn save_then_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DocumentStore::new(dir.path().join("uploads"));
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        let path = store
            .save(9, at, "My Transcript.pdf", b"%PDF-1.4")
            .await
            .expect("save should succeed");

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("9_20250102030405_My_Transcript.pdf")
        );
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");

        store.remove(path.to_str().unwrap()).await;
        assert!(!path.exists());

        // Second remove is a no-op.
        store.remove(path.to_str().unwrap()).await;
    }

    #[tokio::test]
    async fn remove_ignores_paths_outside_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let outside = dir.path().join("keep.txt");
        tokio::fs::write(&outside, b"x").await.unwrap();

        let store = DocumentStore::new(dir.path().join("uploads"));
        store.remove(outside.to_str().unwrap()).await;
        assert!(outside.exists());
    }
}
