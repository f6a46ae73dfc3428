//! Storage tiers and filename rules.

use std::fmt;

use crate::error::CoverError;

/// One of the three storage resolutions of a cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Unmodified uploaded bytes
    Original,

    /// Variant bounded to 768×768
    Mid,

    /// Variant bounded to 384×384
    Low,
}

impl Tier {
    /// All tiers, in the order an upload writes them.
    pub const ALL: [Tier; 3] = [Tier::Original, Tier::Mid, Tier::Low];

    /// Directory name of this tier under the upload root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Tier::Original => "original",
            Tier::Mid => "mid",
            Tier::Low => "low",
        }
    }

    /// Bounding box edge for derived tiers, `None` for the original.
    pub fn bound(self) -> Option<u32> {
        match self {
            Tier::Original => None,
            Tier::Mid => Some(768),
            Tier::Low => Some(384),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Reject filenames that could resolve outside their tier directory.
///
/// Anything else is used verbatim as the storage key, including spaces,
/// unicode and leading dots.
pub fn validate_filename(filename: &str) -> Result<&str, CoverError> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);

    if invalid {
        return Err(CoverError::InvalidFilename {
            filename: filename.to_string(),
        });
    }

    Ok(filename)
}
