//! Product image storage.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use supplyhub_catalog::{ImageStore, ImageStoreError};

/// Reject anything that could escape the image directory.
fn check_name(file_name: &str) -> Result<(), ImageStoreError> {
    let bad = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\', '\0']);
    if bad {
        return Err(ImageStoreError::InvalidName(file_name.to_string()));
    }
    Ok(())
}

/// Images written as plain files under one directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn exists(&self, file_name: &str) -> Result<bool, ImageStoreError> {
        check_name(file_name)?;
        Ok(fs::try_exists(self.root.join(file_name)).await?)
    }

    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        check_name(file_name)?;
        fs::create_dir_all(&self.root).await?;

        let path = self.root.join(file_name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ImageStoreError::AlreadyExists(file_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "image stored");
        Ok(())
    }
}

/// Image store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.read().ok()?.get(file_name).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files
            .read()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

fn poisoned() -> ImageStoreError {
    ImageStoreError::Io(std::io::Error::other("image store lock poisoned"))
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn exists(&self, file_name: &str) -> Result<bool, ImageStoreError> {
        check_name(file_name)?;
        let files = self.files.read().map_err(|_| poisoned())?;
        Ok(files.contains_key(file_name))
    }

    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        check_name(file_name)?;
        let mut files = self.files.write().map_err(|_| poisoned())?;
        if files.contains_key(file_name) {
            return Err(ImageStoreError::AlreadyExists(file_name.to_string()));
        }
        files.insert(file_name.to_string(), bytes.to_vec());
        Ok(())
    }
}
