//! Tiered on-disk storage for cover images.
//!
//! Every cover is stored under the same filename in up to three sibling
//! directories, one per resolution tier:
//!
//! ```text
//! UPLOAD_DIR/
//! ├── original/cover.png   unmodified upload
//! ├── mid/cover.png        fits within 768×768
//! └── low/cover.png        fits within 384×384
//! ```
//!
//! Handlers only talk to the [`TierStore`] trait, so the filesystem layout in
//! [`FsTierStore`] can be swapped for an in-memory store in tests.

mod fs_store;
mod tier;

pub use fs_store::FsTierStore;
pub use tier::{validate_filename, Tier};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Outcome of removing a filename from one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The file existed and was removed
    Removed,

    /// The file was already gone
    Missing,
}

/// Storage backend holding the three tiers of every cover.
///
/// Writes overwrite any existing file of the same name. There is no locking:
/// concurrent writers to the same filename race and the last one wins.
#[async_trait]
pub trait TierStore: Send + Sync {
    /// Check whether `filename` exists in `tier` without reading it.
    async fn exists(&self, tier: Tier, filename: &str) -> Result<bool, StoreError>;

    /// Write `data` to `filename` in `tier`, replacing any previous content.
    async fn write(&self, tier: Tier, filename: &str, data: Bytes) -> Result<(), StoreError>;

    /// Remove `filename` from `tier`.
    ///
    /// A file that is already absent yields [`Removal::Missing`], not an error.
    async fn remove(&self, tier: Tier, filename: &str) -> Result<Removal, StoreError>;
}
