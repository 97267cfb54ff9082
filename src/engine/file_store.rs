//! File Store
//!
//! The filesystem collaborator the cache loads template sources from.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::{Result, TemplateCacheError};

/// Metadata returned by [`FileStore::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Last modification time of the file
    pub modified: SystemTime,
}

/// Source of template files.
///
/// Both operations may suspend and may fail with `NotFound` or `Io`. Any
/// timeout policy lives in the implementation and surfaces as `Io`.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Returns the current metadata of `path`.
    async fn stat(&self, path: &str) -> Result<FileStat>;

    /// Returns the full contents of `path`.
    async fn read_all(&self, path: &str) -> Result<Vec<u8>>;
}

// == Local File Store ==
/// [`FileStore`] over the local filesystem, rooted at a directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `name` onto the root. Names that are absolute or climb out of
    /// the root with `..` resolve to nothing.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(TemplateCacheError::NotFound(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn stat(&self, path: &str) -> Result<FileStat> {
        let full = self.resolve(path)?;
        let metadata = tokio::fs::metadata(&full)
            .await
            .map_err(|e| TemplateCacheError::from_io(path, e))?;
        let modified = metadata
            .modified()
            .map_err(|e| TemplateCacheError::from_io(path, e))?;

        Ok(FileStat { modified })
    }

    async fn read_all(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        tokio::fs::read(&full)
            .await
            .map_err(|e| TemplateCacheError::from_io(path, e))
    }
}
