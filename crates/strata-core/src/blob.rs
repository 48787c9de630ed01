//! The [`Blob`] value: an immutable, elastic byte sequence.

use std::fmt;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::diff::DiffBlob;
use crate::error::{BlobError, BlobResult};
use crate::merge::Edit;
use crate::root::RootBlob;

/// Largest size a blob may grow to through elastic writes.
pub const MAX_SIZE: usize = isize::MAX as usize;

/// An immutable byte sequence.
///
/// A blob is either a [`RootBlob`] holding raw bytes or a [`DiffBlob`]
/// describing replacements over a parent. Every write returns a new blob
/// and leaves the receiver untouched; cloning is cheap and shares storage.
///
/// Blobs are *elastic*: writes may address any index, and writing at or
/// past the end grows the blob, zero-filling any gap. Reads must stay in
/// bounds. Multi-byte integers are big-endian.
#[derive(Clone)]
pub enum Blob {
    Root(RootBlob),
    Diff(DiffBlob),
}

impl Blob {
    /// Create a root blob holding a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::Root(RootBlob::new(data))
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Total number of bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Root(root) => root.size(),
            Self::Diff(diff) => diff.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The complete content.
    pub fn read_all(&self) -> Vec<u8> {
        match self {
            Self::Root(root) => root.as_slice().to_vec(),
            Self::Diff(diff) => diff.read_all(),
        }
    }

    pub fn read_byte(&self, index: usize) -> BlobResult<u8> {
        match self {
            Self::Root(root) => root.read_byte(index),
            Self::Diff(diff) => diff.read_byte(index),
        }
    }

    /// Read a big-endian `i16` at `index`.
    pub fn read_short(&self, index: usize) -> BlobResult<i16> {
        let mut buf = [0u8; 2];
        self.read_bytes_into(index, &mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Read a big-endian `i32` at `index`.
    pub fn read_int(&self, index: usize) -> BlobResult<i32> {
        let mut buf = [0u8; 4];
        self.read_bytes_into(index, &mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Read `length` bytes starting at `index`.
    pub fn read_bytes(&self, index: usize, length: usize) -> BlobResult<Vec<u8>> {
        let mut buf = vec![0u8; length];
        self.read_bytes_into(index, &mut buf)?;
        Ok(buf)
    }

    /// Fill `dest` with the bytes starting at `index`.
    ///
    /// To copy into the middle of a larger buffer, pass a sub-slice.
    pub fn read_bytes_into(&self, index: usize, dest: &mut [u8]) -> BlobResult<()> {
        match self {
            Self::Root(root) => root.read_bytes_into(index, dest),
            Self::Diff(diff) => diff.read_bytes_into(index, dest),
        }
    }

    /// Compare content, regardless of how either blob is represented.
    pub fn content_eq(&self, other: &Blob) -> bool {
        self.size() == other.size() && self.read_all() == other.read_all()
    }

    // ---------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------

    pub fn write_byte(&self, index: usize, value: u8) -> BlobResult<Blob> {
        self.write_bytes(index, &[value])
    }

    /// Write a big-endian `i16` at `index`.
    pub fn write_short(&self, index: usize, value: i16) -> BlobResult<Blob> {
        self.write_bytes(index, &value.to_be_bytes())
    }

    /// Write a big-endian `i32` at `index`.
    pub fn write_int(&self, index: usize, value: i32) -> BlobResult<Blob> {
        self.write_bytes(index, &value.to_be_bytes())
    }

    /// Overwrite `bytes.len()` bytes at `index`.
    pub fn write_bytes(&self, index: usize, bytes: &[u8]) -> BlobResult<Blob> {
        self.replace_bytes(index, bytes.len(), bytes)
    }

    /// Replace `length` bytes at `index` with `bytes`, which may be of a
    /// different length.
    ///
    /// The replaced region is clipped to the end of the blob. A request that
    /// clips down to nothing (deleting past the end) returns the receiver
    /// unchanged. Growing past [`MAX_SIZE`] fails with
    /// [`BlobError::CapacityExceeded`].
    pub fn replace_bytes(&self, index: usize, length: usize, bytes: &[u8]) -> BlobResult<Blob> {
        if length == 0 && bytes.is_empty() {
            return Err(BlobError::InvalidReplacement { offset: index });
        }
        let size = self.size();
        let edit = if index >= size {
            if bytes.is_empty() {
                return Ok(self.clone());
            }
            if index.checked_add(bytes.len()).map_or(true, |end| end > MAX_SIZE) {
                return Err(BlobError::CapacityExceeded {
                    index,
                    length: bytes.len(),
                });
            }
            let mut buf = BytesMut::zeroed(index - size);
            buf.extend_from_slice(bytes);
            Edit {
                offset: size,
                length: 0,
                bytes: buf.freeze(),
            }
        } else {
            Edit {
                offset: index,
                length: length.min(size - index),
                bytes: Bytes::copy_from_slice(bytes),
            }
        };
        trace!(index, length, len = bytes.len(), size, "blob edit");
        Ok(self.apply(&edit))
    }

    pub fn insert_byte(&self, index: usize, value: u8) -> BlobResult<Blob> {
        self.insert_bytes(index, &[value])
    }

    /// Insert a big-endian `i16` before `index`.
    pub fn insert_short(&self, index: usize, value: i16) -> BlobResult<Blob> {
        self.insert_bytes(index, &value.to_be_bytes())
    }

    /// Insert a big-endian `i32` before `index`.
    pub fn insert_int(&self, index: usize, value: i32) -> BlobResult<Blob> {
        self.insert_bytes(index, &value.to_be_bytes())
    }

    /// Insert `bytes` before `index`.
    pub fn insert_bytes(&self, index: usize, bytes: &[u8]) -> BlobResult<Blob> {
        self.replace_bytes(index, 0, bytes)
    }

    fn apply(&self, edit: &Edit) -> Blob {
        let diff = match self {
            Self::Root(_) => DiffBlob::from_parts(
                Arc::new(self.clone()),
                crate::merge::apply_edit(&[], edit),
            ),
            Self::Diff(diff) => diff.with_edit(edit),
        };
        Self::Diff(diff)
    }

    // ---------------------------------------------------------------
    // Lineage
    // ---------------------------------------------------------------

    /// Combine two disjoint blobs of the same lineage.
    ///
    /// Valid when both are diffs over the same parent (their replacement
    /// lists are unioned), or when one is the immediate parent of the other
    /// (the child already contains the parent, and is returned).
    pub fn merge(&self, sibling: &Blob) -> BlobResult<Blob> {
        if self.same_as(sibling) {
            return Ok(self.clone());
        }
        match (self, sibling) {
            (Self::Diff(a), Self::Diff(b)) if a.parent().same_as(b.parent()) => {
                Ok(Self::Diff(a.combine(b)?))
            }
            (Self::Diff(a), _) if a.parent().same_as(sibling) => Ok(self.clone()),
            (_, Self::Diff(b)) if b.parent().same_as(self) => Ok(sibling.clone()),
            _ => Err(BlobError::IncompatibleMerge(
                "blobs share no parent and neither is the parent of the other".into(),
            )),
        }
    }

    /// Returns `true` if both handles denote the very same blob value.
    pub fn same_as(&self, other: &Blob) -> bool {
        match (self, other) {
            (Self::Root(a), Self::Root(b)) => a.same_as(b),
            (Self::Diff(a), Self::Diff(b)) => a.same_as(b),
            _ => false,
        }
    }

    pub fn is_diff(&self) -> bool {
        matches!(self, Self::Diff(_))
    }

    pub fn as_diff(&self) -> Option<&DiffBlob> {
        match self {
            Self::Diff(diff) => Some(diff),
            Self::Root(_) => None,
        }
    }

    /// The parent of a diff blob.
    pub fn parent(&self) -> Option<&Blob> {
        self.as_diff().map(DiffBlob::parent)
    }

    /// Number of replacements (zero for a root blob).
    pub fn count(&self) -> usize {
        self.as_diff().map_or(0, DiffBlob::count)
    }
}

impl From<RootBlob> for Blob {
    fn from(root: RootBlob) -> Self {
        Self::Root(root)
    }
}

impl From<DiffBlob> for Blob {
    fn from(diff: DiffBlob) -> Self {
        Self::Diff(diff)
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Self::Root(RootBlob::from(data))
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(root) => root.fmt(f),
            Self::Diff(diff) => diff.fmt(f),
        }
    }
}
