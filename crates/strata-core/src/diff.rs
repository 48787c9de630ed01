//! Blobs expressed as a parent plus a flat list of replacements.

use std::fmt;
use std::sync::Arc;

use crate::blob::Blob;
use crate::error::{BlobError, BlobResult};
use crate::merge::{self, Edit};
use crate::remap::{self, Location};
use crate::replacement::Replacement;

/// A blob derived from `parent` by a sorted list of non-overlapping
/// replacements.
///
/// Replacement offsets are in the parent's coordinate space. Writing to a
/// `DiffBlob` folds the write into a fresh copy of this list and keeps the
/// same parent, so lineages stay one level deep no matter how many edits
/// are made.
#[derive(Clone)]
pub struct DiffBlob {
    parent: Arc<Blob>,
    replacements: Arc<[Replacement]>,
    size: usize,
}

impl DiffBlob {
    /// Build a diff from an explicit replacement list.
    ///
    /// The list must be sorted by offset, non-overlapping, and every
    /// replaced region must lie within `parent`. Touching entries are
    /// accepted as given.
    pub fn new(parent: Blob, replacements: Vec<Replacement>) -> BlobResult<Self> {
        let parent_size = parent.size();
        let mut previous_end = 0;
        for r in &replacements {
            if r.offset() < previous_end {
                return Err(BlobError::Overlapping {
                    previous_end,
                    offset: r.offset(),
                });
            }
            if r.parent_end() > parent_size {
                return Err(BlobError::OutOfBounds {
                    index: r.offset(),
                    length: r.size(),
                    size: parent_size,
                });
            }
            previous_end = r.parent_end();
        }
        Ok(Self::from_parts(Arc::new(parent), replacements))
    }

    pub(crate) fn from_parts(parent: Arc<Blob>, replacements: Vec<Replacement>) -> Self {
        let size = parent
            .size()
            .saturating_add_signed(remap::net_delta(&replacements));
        Self {
            parent,
            replacements: replacements.into(),
            size,
        }
    }

    /// The blob these replacements apply to.
    pub fn parent(&self) -> &Blob {
        &self.parent
    }

    /// Number of replacements.
    pub fn count(&self) -> usize {
        self.replacements.len()
    }

    /// The `i`th replacement in offset order.
    pub fn replacement(&self, i: usize) -> Option<&Replacement> {
        self.replacements.get(i)
    }

    /// All replacements in offset order.
    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Size of the content after every replacement is applied.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn read_byte(&self, index: usize) -> BlobResult<u8> {
        if index >= self.size {
            return Err(BlobError::OutOfBounds {
                index,
                length: 1,
                size: self.size,
            });
        }
        match remap::locate(index, &self.replacements) {
            Location::Parent(p) => self.parent.read_byte(p),
            Location::Replaced { index: i, inner } => Ok(self.replacements[i].bytes()[inner]),
        }
    }

    /// Fill `dest` with the bytes starting at `index`.
    pub fn read_bytes_into(&self, index: usize, dest: &mut [u8]) -> BlobResult<()> {
        let end = index
            .checked_add(dest.len())
            .filter(|end| *end <= self.size)
            .ok_or(BlobError::OutOfBounds {
                index,
                length: dest.len(),
                size: self.size,
            })?;

        for segment in self.segments() {
            let seg_end = segment.start() + segment.len();
            if seg_end <= index {
                continue;
            }
            if segment.start() >= end {
                break;
            }
            let lo = segment.start().max(index);
            let hi = seg_end.min(end);
            let out = &mut dest[lo - index..hi - index];
            match segment {
                Segment::Parent {
                    start,
                    parent_offset,
                    ..
                } => self.parent.read_bytes_into(parent_offset + (lo - start), out)?,
                Segment::Replaced { start, bytes } => {
                    out.copy_from_slice(&bytes[lo - start..hi - start])
                }
            }
        }
        Ok(())
    }

    /// The complete content, assembled segment by segment.
    pub(crate) fn read_all(&self) -> Vec<u8> {
        let parent = self.parent.read_all();
        let mut out = Vec::with_capacity(self.size);
        for segment in self.segments() {
            match segment {
                Segment::Parent {
                    parent_offset, len, ..
                } => out.extend_from_slice(&parent[parent_offset..parent_offset + len]),
                Segment::Replaced { bytes, .. } => out.extend_from_slice(bytes),
            }
        }
        out
    }

    /// Fold a current-space edit into this diff.
    pub(crate) fn with_edit(&self, edit: &Edit) -> DiffBlob {
        let replacements = merge::apply_edit(&self.replacements, edit);
        Self::from_parts(Arc::clone(&self.parent), replacements)
    }

    /// Union with a diff over the same parent.
    pub(crate) fn combine(&self, sibling: &DiffBlob) -> BlobResult<DiffBlob> {
        let replacements = merge::combine_siblings(&self.replacements, &sibling.replacements)?;
        Ok(Self::from_parts(Arc::clone(&self.parent), replacements))
    }

    pub(crate) fn same_as(&self, other: &DiffBlob) -> bool {
        Arc::ptr_eq(&self.parent, &other.parent)
            && Arc::ptr_eq(&self.replacements, &other.replacements)
    }

    /// Walk the content as alternating parent runs and replacement bytes.
    fn segments(&self) -> Segments<'_> {
        Segments {
            replacements: self.replacements.iter(),
            parent_size: self.parent.size(),
            parent_pos: 0,
            cur_pos: 0,
            pending: None,
            finished: false,
        }
    }
}

impl fmt::Debug for DiffBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffBlob")
            .field("size", &self.size)
            .field("parent", &self.parent)
            .field("replacements", &self.replacements)
            .finish()
    }
}

/// A contiguous run of a diff's content.
#[derive(Clone, Copy, Debug)]
enum Segment<'a> {
    Parent {
        start: usize,
        parent_offset: usize,
        len: usize,
    },
    Replaced {
        start: usize,
        bytes: &'a [u8],
    },
}

impl Segment<'_> {
    fn start(&self) -> usize {
        match self {
            Self::Parent { start, .. } | Self::Replaced { start, .. } => *start,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Parent { len, .. } => *len,
            Self::Replaced { bytes, .. } => bytes.len(),
        }
    }
}

struct Segments<'a> {
    replacements: std::slice::Iter<'a, Replacement>,
    parent_size: usize,
    parent_pos: usize,
    cur_pos: usize,
    pending: Option<&'a Replacement>,
    finished: bool,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        loop {
            if let Some(r) = self.pending.take() {
                let start = self.cur_pos;
                self.cur_pos += r.bytes().len();
                self.parent_pos = r.parent_end();
                if r.bytes().is_empty() {
                    continue;
                }
                return Some(Segment::Replaced {
                    start,
                    bytes: r.bytes(),
                });
            }

            let gap_end = match self.replacements.next() {
                Some(r) => {
                    self.pending = Some(r);
                    r.offset()
                }
                None if !self.finished => {
                    self.finished = true;
                    self.parent_size
                }
                None => return None,
            };
            let len = gap_end - self.parent_pos;
            if len == 0 {
                continue;
            }
            let segment = Segment::Parent {
                start: self.cur_pos,
                parent_offset: self.parent_pos,
                len,
            };
            self.cur_pos += len;
            self.parent_pos = gap_end;
            return Some(segment);
        }
    }
}
