//! Array-backed blobs: the base of every lineage.

use std::fmt;
use std::sync::Arc;

use crate::error::{BlobError, BlobResult};

/// A blob backed directly by an immutable byte array.
///
/// Cloning is cheap and shares the array. The array is never written after
/// construction, so any number of diffs may sit on the same root.
#[derive(Clone)]
pub struct RootBlob {
    data: Arc<[u8]>,
}

impl RootBlob {
    /// Snapshot `data` into a new root.
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: Arc::from(data),
        }
    }

    /// Total number of bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The full content.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Read the byte at `index`.
    pub fn read_byte(&self, index: usize) -> BlobResult<u8> {
        self.data
            .get(index)
            .copied()
            .ok_or(BlobError::OutOfBounds {
                index,
                length: 1,
                size: self.size(),
            })
    }

    /// Fill `dest` with the bytes starting at `index`.
    pub fn read_bytes_into(&self, index: usize, dest: &mut [u8]) -> BlobResult<()> {
        let src = index
            .checked_add(dest.len())
            .and_then(|end| self.data.get(index..end))
            .ok_or(BlobError::OutOfBounds {
                index,
                length: dest.len(),
                size: self.size(),
            })?;
        dest.copy_from_slice(src);
        Ok(())
    }

    /// Returns `true` if both handles share the same array.
    pub fn same_as(&self, other: &RootBlob) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl From<Vec<u8>> for RootBlob {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data: Arc::from(data),
        }
    }
}

impl fmt::Debug for RootBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootBlob").field("size", &self.size()).finish()
    }
}
