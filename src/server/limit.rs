//! Size-capped accumulation of streamed upload bytes.

use bytes::{Bytes, BytesMut};
use thiserror::Error;

/// Raised as soon as a stream crosses its byte cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stream exceeded {limit} bytes")]
pub struct LimitExceeded {
    /// The cap that was crossed
    pub limit: usize,
}

/// Collects chunks of a streamed body, failing once more than `limit` bytes
/// have arrived.
///
/// The overflowing chunk is never copied, so memory use stays bounded by the
/// cap no matter how large the incoming stream is.
#[derive(Debug)]
pub struct BoundedBuffer {
    limit: usize,
    buf: BytesMut,
}

impl BoundedBuffer {
    /// Create an empty buffer accepting at most `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            buf: BytesMut::new(),
        }
    }

    /// Append a chunk, or fail if it would take the total past the cap.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), LimitExceeded> {
        if chunk.len() > self.limit - self.buf.len() {
            return Err(LimitExceeded { limit: self.limit });
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Number of bytes collected so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the buffer, returning the collected bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}
