//! Port for stored recipe image files.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Reading or writing the backing storage failed.
        Io { message } =>
            "image store I/O failed: {message}",
    }
}

/// Port for blob storage of recipe images.
///
/// File names are opaque to the store; the domain derives them from a random
/// identifier so they cannot be guessed or collide.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under `file_name`, replacing any existing file.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError>;

    /// Remove a stored file. Removing a file that does not exist is not an
    /// error; the goal is only that no orphan remains.
    async fn remove(&self, file_name: &str) -> Result<(), ImageStoreError>;
}

/// Fixture store that accepts and discards every file.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStore;

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn save(&self, _file_name: &str, _bytes: &[u8]) -> Result<(), ImageStoreError> {
        Ok(())
    }

    async fn remove(&self, _file_name: &str) -> Result<(), ImageStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_discards_writes_and_removals() {
        let store = FixtureImageStore;
        store.save("a.png", b"bytes").await.expect("fixture save");
        store.remove("a.png").await.expect("fixture remove");
    }
}
