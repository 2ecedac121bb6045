//! # File Key-Value Store
//!
//! Stores each key as a JSON document in the data directory:
//!
//! ```text
//! data/
//! ├── nownext.yaml
//! ├── allboards.json    ← one file per key
//! └── images/
//! ```
//!
//! Writes go to a temporary file first and are renamed over the original, so
//! a crash mid-write never leaves a truncated collection behind.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::traits::KeyValueStore;

#[derive(Clone)]
pub struct FileKeyValueStore {
    base_directory: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)?;
        }
        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            bail!("invalid storage key '{}'", key);
        }
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &path).await?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_read_remove() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileKeyValueStore::new(temp_dir.path()).unwrap();

        assert!(store.read("allboards").await.unwrap().is_none());

        store.write("allboards", "[]").await.unwrap();
        assert_eq!(store.read("allboards").await.unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("allboards.json").exists());
        assert!(!temp_dir.path().join("allboards.json.tmp").exists());

        assert!(store.remove("allboards").await.unwrap());
        assert!(!store.remove("allboards").await.unwrap());
        assert!(store.read("allboards").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_creates_missing_base_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("a").join("b");

        let store = FileKeyValueStore::new(&nested).unwrap();
        store.write("allboards", "[]").await.unwrap();

        assert!(nested.join("allboards.json").exists());
    }

    #[tokio::test]
    async fn test_rejects_keys_that_escape_the_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileKeyValueStore::new(temp_dir.path()).unwrap();

        assert!(store.write("../outside", "x").await.is_err());
        assert!(store.read("nested/key").await.is_err());
        assert!(store.remove("").await.is_err());
    }
}
