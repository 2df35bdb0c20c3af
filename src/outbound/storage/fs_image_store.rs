//! Filesystem-backed `ImageStore` implementation.
//!
//! Stores uploaded images as flat files under a media root. File names are
//! domain-generated UUIDs, so the adapter refuses anything that looks like a
//! path rather than a bare name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ImageStore, ImageStoreError};

/// Image store writing to a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, file_name: &str) -> Result<PathBuf, ImageStoreError> {
        let candidate = Path::new(file_name);
        let is_bare_name = candidate.components().count() == 1
            && !file_name.contains(['/', '\\'])
            && file_name != ".."
            && file_name != ".";
        if !is_bare_name {
            return Err(ImageStoreError::io(format!(
                "refusing non-bare file name: {file_name}"
            )));
        }
        Ok(self.root.join(file_name))
    }
}

fn map_io_error(error: std::io::Error) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let path = self.resolve(file_name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(map_io_error)?;
        tokio::fs::write(&path, bytes).await.map_err(map_io_error)?;
        debug!(file = file_name, size = bytes.len(), "image stored");
        Ok(())
    }

    async fn remove(&self, file_name: &str) -> Result<(), ImageStoreError> {
        let path = self.resolve(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone is the desired end state.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_remove_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FsImageStore::new(dir.path());

        store.save("a.png", b"bytes").await.expect("save");
        let written = tokio::fs::read(dir.path().join("a.png"))
            .await
            .expect("read back");
        assert_eq!(written, b"bytes");

        store.remove("a.png").await.expect("remove");
        assert!(!dir.path().join("a.png").exists());
    }

    #[tokio::test]
    async fn removing_a_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FsImageStore::new(dir.path());

        store.remove("never-existed.png").await.expect("remove");
    }

    #[tokio::test]
    async fn rejects_path_traversal_names() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FsImageStore::new(dir.path());

        let err = store
            .save("../escape.png", b"bytes")
            .await
            .expect_err("traversal name");
        assert!(err.to_string().contains("non-bare"));
    }
}
