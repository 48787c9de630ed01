//! Typed views over blob bytes.
//!
//! A [`Layout`] describes how a value is laid out at some offset in a blob.
//! Schema systems build on this trait; this module only ships the primitive
//! big-endian integers and fixed-width byte runs they are composed from.

use crate::blob::Blob;
use crate::error::{BlobError, BlobResult};

/// How a value of type [`Layout::Value`] is encoded at an offset.
pub trait Layout {
    type Value;

    /// Size in bytes of the instance starting at `offset`.
    fn size_of(&self, blob: &Blob, offset: usize) -> BlobResult<usize>;

    /// Decode the instance starting at `offset`.
    fn read(&self, blob: &Blob, offset: usize) -> BlobResult<Self::Value>;

    /// Overwrite the instance at `offset`. Does not change the blob's size
    /// unless the write runs past the end.
    fn write(&self, value: &Self::Value, blob: &Blob, offset: usize) -> BlobResult<Blob>;

    /// Insert a new instance before `offset`, growing the blob.
    fn insert(&self, value: &Self::Value, blob: &Blob, offset: usize) -> BlobResult<Blob>;
}

/// A layout whose size does not depend on the data.
pub trait StaticLayout: Layout {
    fn size(&self) -> usize;
}

/// Signed 8-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct I8;

/// Big-endian signed 16-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct I16;

/// Big-endian signed 32-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct I32;

impl Layout for I8 {
    type Value = i8;

    fn size_of(&self, _blob: &Blob, _offset: usize) -> BlobResult<usize> {
        Ok(1)
    }

    fn read(&self, blob: &Blob, offset: usize) -> BlobResult<i8> {
        blob.read_byte(offset).map(|b| b as i8)
    }

    fn write(&self, value: &i8, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        blob.write_byte(offset, *value as u8)
    }

    fn insert(&self, value: &i8, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        blob.insert_byte(offset, *value as u8)
    }
}

impl StaticLayout for I8 {
    fn size(&self) -> usize {
        1
    }
}

impl Layout for I16 {
    type Value = i16;

    fn size_of(&self, _blob: &Blob, _offset: usize) -> BlobResult<usize> {
        Ok(2)
    }

    fn read(&self, blob: &Blob, offset: usize) -> BlobResult<i16> {
        blob.read_short(offset)
    }

    fn write(&self, value: &i16, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        blob.write_short(offset, *value)
    }

    fn insert(&self, value: &i16, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        blob.insert_short(offset, *value)
    }
}

impl StaticLayout for I16 {
    fn size(&self) -> usize {
        2
    }
}

impl Layout for I32 {
    type Value = i32;

    fn size_of(&self, _blob: &Blob, _offset: usize) -> BlobResult<usize> {
        Ok(4)
    }

    fn read(&self, blob: &Blob, offset: usize) -> BlobResult<i32> {
        blob.read_int(offset)
    }

    fn write(&self, value: &i32, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        blob.write_int(offset, *value)
    }

    fn insert(&self, value: &i32, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        blob.insert_int(offset, *value)
    }
}

impl StaticLayout for I32 {
    fn size(&self) -> usize {
        4
    }
}

/// A run of exactly `n` raw bytes.
#[derive(Clone, Copy, Debug)]
pub struct FixedBytes(pub usize);

impl FixedBytes {
    fn check(&self, value: &[u8]) -> BlobResult<()> {
        if value.len() != self.0 {
            return Err(BlobError::LayoutMismatch {
                expected: self.0,
                actual: value.len(),
            });
        }
        Ok(())
    }
}

impl Layout for FixedBytes {
    type Value = Vec<u8>;

    fn size_of(&self, _blob: &Blob, _offset: usize) -> BlobResult<usize> {
        Ok(self.0)
    }

    fn read(&self, blob: &Blob, offset: usize) -> BlobResult<Vec<u8>> {
        blob.read_bytes(offset, self.0)
    }

    fn write(&self, value: &Vec<u8>, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        self.check(value)?;
        blob.write_bytes(offset, value)
    }

    fn insert(&self, value: &Vec<u8>, blob: &Blob, offset: usize) -> BlobResult<Blob> {
        self.check(value)?;
        blob.insert_bytes(offset, value)
    }
}

impl StaticLayout for FixedBytes {
    fn size(&self) -> usize {
        self.0
    }
}
