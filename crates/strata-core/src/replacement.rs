//! A single span-for-bytes substitution.

use std::fmt;

use bytes::Bytes;

use crate::error::{BlobError, BlobResult};

/// Replaces `length` bytes starting at `offset` with `bytes`.
///
/// Offsets and lengths are expressed in the space of the blob the
/// replacement is scoped to (the parent of the diff holding it). The
/// replacement may grow or shrink that region:
///
/// - pure insertion: `length == 0`
/// - pure deletion: `bytes` is empty
/// - overwrite: `length == bytes.len()`
///
/// A replacement with zero length and no bytes is meaningless and cannot be
/// constructed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Replacement {
    offset: usize,
    length: usize,
    bytes: Bytes,
}

impl Replacement {
    /// Create a replacement, rejecting the null edit.
    pub fn new(offset: usize, length: usize, bytes: impl Into<Bytes>) -> BlobResult<Self> {
        let bytes = bytes.into();
        if length == 0 && bytes.is_empty() {
            return Err(BlobError::InvalidReplacement { offset });
        }
        Ok(Self {
            offset,
            length,
            bytes,
        })
    }

    /// Insert `bytes` before `offset`.
    pub fn insertion(offset: usize, bytes: impl Into<Bytes>) -> BlobResult<Self> {
        Self::new(offset, 0, bytes)
    }

    /// Remove `length` bytes starting at `offset`.
    pub fn deletion(offset: usize, length: usize) -> BlobResult<Self> {
        Self::new(offset, length, Bytes::new())
    }

    /// Starting offset of the replaced region.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes replaced.
    pub fn size(&self) -> usize {
        self.length
    }

    /// The replacement bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The replacement bytes as a shared buffer.
    pub fn shared_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// One past the last replaced byte.
    pub fn parent_end(&self) -> usize {
        self.offset + self.length
    }

    /// Net change in size this replacement causes.
    pub fn delta(&self) -> isize {
        self.bytes.len() as isize - self.length as isize
    }

    /// Returns `true` if nothing of the parent is replaced.
    pub fn is_insertion(&self) -> bool {
        self.length == 0
    }

    /// Returns `true` if the replaced region is simply removed.
    pub fn is_deletion(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Replacement({}..{} => \"{}\")",
            self.offset,
            self.parent_end(),
            self.bytes.escape_ascii()
        )
    }
}
