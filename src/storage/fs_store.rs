//! Local filesystem implementation of `TierStore`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::StoreError;

use super::{Removal, Tier, TierStore};

/// Tier store backed by three sibling directories under a base path.
///
/// # Example
///
/// ```ignore
/// use cover_store::storage::{FsTierStore, Tier};
///
/// let store = FsTierStore::new("/var/lib/covers");
/// store.ensure_dirs().await?;
///
/// // "/var/lib/covers/mid/cover.png"
/// let path = store.path(Tier::Mid, "cover.png");
/// ```
#[derive(Debug, Clone)]
pub struct FsTierStore {
    base: PathBuf,
}

impl FsTierStore {
    /// Create a store rooted at `base`. Directories are not touched until
    /// [`ensure_dirs`](Self::ensure_dirs) is called.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base upload directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory holding `tier`.
    pub fn tier_dir(&self, tier: Tier) -> PathBuf {
        self.base.join(tier.dir_name())
    }

    /// Full path of `filename` inside `tier`.
    pub fn path(&self, tier: Tier, filename: &str) -> PathBuf {
        self.tier_dir(tier).join(filename)
    }

    /// Create every tier directory (and the base) if absent.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for tier in Tier::ALL {
            let dir = self.tier_dir(tier);
            tokio::fs::create_dir_all(&dir).await?;
            debug!(dir = %dir.display(), "tier directory ready");
        }
        Ok(())
    }
}

#[async_trait]
impl TierStore for FsTierStore {
    async fn exists(&self, tier: Tier, filename: &str) -> Result<bool, StoreError> {
        let path = self.path(tier, filename);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|source| StoreError::Probe { path, source })
    }

    async fn write(&self, tier: Tier, filename: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.path(tier, filename);
        match tokio::fs::write(&path, &data).await {
            Ok(()) => {
                debug!(path = %path.display(), bytes = data.len(), "wrote tier file");
                Ok(())
            }
            Err(source) => Err(StoreError::Write { path, source }),
        }
    }

    async fn remove(&self, tier: Tier, filename: &str) -> Result<Removal, StoreError> {
        let path = self.path(tier, filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "removed tier file");
                Ok(Removal::Removed)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Removal::Missing),
            Err(source) => Err(StoreError::Remove { path, source }),
        }
    }
}
