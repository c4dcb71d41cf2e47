//! Directory-backed content store.
//!
//! Each object lives in `<dir>/<cid>`. Writes go to a temporary file first and
//! are renamed into place, so a reader never sees a partial object.

use crate::domain::ContentId;
use crate::ports::outbound::{ContentStore, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FsContentStore {
    dir: PathBuf,
}

impl FsContentStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await.map_err(io_error)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn object_path(&self, id: &ContentId) -> PathBuf {
        self.dir.join(id.to_string())
    }
}

fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Io {
        reason: err.to_string(),
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn pin(&self, bytes: &[u8]) -> Result<ContentId, StoreError> {
        let id = ContentId::for_bytes(bytes);
        let path = self.object_path(&id);

        if fs::try_exists(&path).await.map_err(io_error)? {
            debug!(cid = %id, "Content already pinned");
            return Ok(id);
        }

        let temp_path = self.dir.join(format!(".{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(e));
        }
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(e));
        }

        debug!(cid = %id, bytes = bytes.len(), "Content pinned");
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.object_path(id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    async fn contains(&self, id: &ContentId) -> Result<bool, StoreError> {
        fs::try_exists(self.object_path(id)).await.map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_pin_and_get() {
        let temp = TempDir::new().unwrap();
        let store = FsContentStore::open(temp.path()).await.unwrap();

        let id = store.pin(b"{\"name\":\"credit\"}").await.unwrap();

        assert!(temp.path().join(id.to_string()).exists());
        assert_eq!(
            store.get(&id).await.unwrap(),
            Some(b"{\"name\":\"credit\"}".to_vec())
        );
    }

    #[tokio::test]
    async fn test_repin_leaves_single_object() {
        let temp = TempDir::new().unwrap();
        let store = FsContentStore::open(temp.path()).await.unwrap();

        let first = store.pin(b"same").await.unwrap();
        let second = store.pin(b"same").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_object_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FsContentStore::open(temp.path().join("nested")).await.unwrap();

        let id = ContentId::for_bytes(b"never pinned");
        assert_eq!(store.get(&id).await.unwrap(), None);
        assert!(!store.contains(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_contains_follows_the_directory() {
        let temp = TempDir::new().unwrap();
        let store = FsContentStore::open(temp.path()).await.unwrap();

        let id = store.pin(b"metadata").await.unwrap();
        assert!(store.contains(&id).await.unwrap());

        std::fs::remove_file(temp.path().join(id.to_string())).unwrap();
        assert!(!store.contains(&id).await.unwrap());
    }
}
