//! services/api/src/adapters/file_store.rs
//!
//! File-backed implementation of the `StateStorage` port: one JSON file per
//! named blob under the configured data directory. This is the server-side
//! stand-in for the browser's persisted storage.

use std::path::PathBuf;

use async_trait::async_trait;
use moodbite_core::ports::{PortError, PortResult, StateStorage};

/// A storage adapter that keeps each named blob in its own file.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Creates the data directory if it does not exist yet.
    pub async fn init(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

#[async_trait]
impl StateStorage for FileStore {
    async fn load(&self, name: &str) -> PortResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(name)).await {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Storage(format!("failed to read blob {name}: {e}"))),
        }
    }

    async fn save(&self, name: &str, payload: &str) -> PortResult<()> {
        // Write to a temp file and rename so a crash mid-write never leaves
        // a half-written blob behind.
        let path = self.path_for(name);
        let tmp = self.root.join(format!("{name}.json.tmp"));
        tokio::fs::write(&tmp, payload)
            .await
            .map_err(|e| PortError::Storage(format!("failed to write blob {name}: {e}")))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PortError::Storage(format!("failed to replace blob {name}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("moodbite-filestore-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = scratch_dir();
        let store = FileStore::new(dir.clone());
        store.init().await.unwrap();

        assert_eq!(store.load("food-store").await.unwrap(), None);

        store.save("food-store", r#"{"version":1}"#).await.unwrap();
        assert_eq!(
            store.load("food-store").await.unwrap().as_deref(),
            Some(r#"{"version":1}"#)
        );

        // Overwrites replace the previous payload.
        store.save("food-store", r#"{"version":2}"#).await.unwrap();
        assert_eq!(
            store.load("food-store").await.unwrap().as_deref(),
            Some(r#"{"version":2}"#)
        );

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn blobs_are_independent_files() {
        let dir = scratch_dir();
        let store = FileStore::new(dir.clone());
        store.init().await.unwrap();

        store.save("moodbite-preferences", "a").await.unwrap();
        store.save("food-store", "b").await.unwrap();

        assert_eq!(
            store.load("moodbite-preferences").await.unwrap().as_deref(),
            Some("a")
        );
        assert_eq!(store.load("food-store").await.unwrap().as_deref(), Some("b"));

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}
