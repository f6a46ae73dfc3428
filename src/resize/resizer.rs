//! Bounding-box resizer.
//!
//! # Design Decisions
//!
//! - **Same format out as in**: a PNG upload yields PNG variants and a JPEG
//!   upload yields JPEG variants. The format is sniffed from the bytes, not
//!   taken from the declared content type.
//!
//! - **No upscaling**: images already inside a bounding box are re-encoded at
//!   their native size.
//!
//! - **Synchronous**: callers run this on a blocking thread.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::ResizeError;
use crate::storage::Tier;

/// A re-encoded variant destined for one derived tier.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Tier the variant belongs to
    pub tier: Tier,

    /// Encoded image bytes
    pub data: Bytes,

    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,
}

/// Decodes an original cover and re-encodes it for every derived tier.
#[derive(Debug, Clone)]
pub struct Resizer {
    filter: FilterType,
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Resizer {
    /// Create a resizer using Lanczos3 resampling.
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Create a resizer with a specific resampling filter.
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }

    /// Produce the `mid` and `low` variants of `source`, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bytes are not PNG or JPEG
    /// - Decoding fails (truncated or corrupt image)
    /// - Encoding a variant fails
    pub fn derive(&self, source: &[u8]) -> Result<Vec<Variant>, ResizeError> {
        let format = detect_format(source)?;

        let reader = ImageReader::with_format(Cursor::new(source), format);
        let img = reader.decode().map_err(|e| ResizeError::Decode {
            message: e.to_string(),
        })?;

        Tier::ALL
            .iter()
            .filter_map(|tier| tier.bound().map(|bound| (*tier, bound)))
            .map(|(tier, bound)| self.encode_variant(&img, format, tier, bound))
            .collect()
    }

    fn encode_variant(
        &self,
        img: &DynamicImage,
        format: ImageFormat,
        tier: Tier,
        bound: u32,
    ) -> Result<Variant, ResizeError> {
        let (width, height) = fit_within(img.width(), img.height(), bound);

        let resized = if (width, height) == (img.width(), img.height()) {
            img.clone()
        } else {
            img.resize_exact(width, height, self.filter)
        };

        let mut output = Cursor::new(Vec::new());
        resized
            .write_to(&mut output, format)
            .map_err(|e| ResizeError::Encode {
                bound,
                message: e.to_string(),
            })?;

        Ok(Variant {
            tier,
            data: Bytes::from(output.into_inner()),
            width,
            height,
        })
    }
}

/// Sniff the encoded format, accepting only PNG and JPEG.
fn detect_format(source: &[u8]) -> Result<ImageFormat, ResizeError> {
    let format = image::guess_format(source).map_err(|e| ResizeError::UnsupportedFormat {
        reason: e.to_string(),
    })?;

    match format {
        ImageFormat::Png | ImageFormat::Jpeg => Ok(format),
        other => Err(ResizeError::UnsupportedFormat {
            reason: format!("{:?} is not a cover format", other),
        }),
    }
}

/// Dimensions of a `width`×`height` image scaled to fit a `bound`×`bound` box.
///
/// Aspect ratio is preserved, the longer side becomes `bound`, and images
/// already inside the box keep their size. Neither side drops below 1.
pub fn fit_within(width: u32, height: u32, bound: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= bound {
        return (width, height);
    }

    let scale = |side: u32| -> u32 {
        let (side, bound, longest) = (u64::from(side), u64::from(bound), u64::from(longest));
        // Round to nearest
        let scaled = (side * bound + longest / 2) / longest;
        (scaled as u32).max(1)
    };

    (scale(width), scale(height))
}
