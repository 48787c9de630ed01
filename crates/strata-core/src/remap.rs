//! Coordinate remapping between a diff's current space and its parent space.
//!
//! A diff stores its replacements in *parent space*: offsets into the blob
//! the diff sits on. Callers address the diff in *current space*: offsets
//! into the content after every replacement has been applied. The two drift
//! apart by the running sum of `bytes.len() - length` of the replacements
//! passed so far.
//!
//! All functions here are pure and assume `replacements` is sorted by offset
//! and non-overlapping.

use std::ops::Range;

use crate::replacement::Replacement;

/// Where a current-space offset lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// The byte comes straight from the parent at this offset.
    Parent(usize),
    /// The byte is `inner` bytes into replacement `index`.
    Replaced { index: usize, inner: usize },
}

/// Resolve a current-space offset to its source.
///
/// An offset sitting exactly on a pure deletion resolves past it, to the
/// first parent byte after the deleted region.
pub fn locate(offset: usize, replacements: &[Replacement]) -> Location {
    let mut parent_pos = 0;
    let mut cur_pos = 0;
    for (index, r) in replacements.iter().enumerate() {
        let cur_start = cur_pos + (r.offset() - parent_pos);
        if offset < cur_start {
            return Location::Parent(parent_pos + (offset - cur_pos));
        }
        let cur_end = cur_start + r.bytes().len();
        if offset < cur_end {
            return Location::Replaced {
                index,
                inner: offset - cur_start,
            };
        }
        parent_pos = r.parent_end();
        cur_pos = cur_end;
    }
    Location::Parent(parent_pos + (offset - cur_pos))
}

/// Translate a current-space offset into parent space.
///
/// Offsets between replacements translate exactly. An offset inside a
/// replacement's bytes clamps to that replacement's parent start.
pub fn to_parent_space(offset: usize, replacements: &[Replacement]) -> usize {
    match locate(offset, replacements) {
        Location::Parent(p) => p,
        Location::Replaced { index, .. } => replacements[index].offset(),
    }
}

/// Translate a parent-space offset into current space.
///
/// An offset covered by a replacement clamps to the start of that
/// replacement's bytes.
pub fn to_current_space(offset: usize, replacements: &[Replacement]) -> usize {
    let mut parent_pos = 0;
    let mut cur_pos = 0;
    for r in replacements {
        let cur_start = cur_pos + (r.offset() - parent_pos);
        if offset <= r.offset() {
            return cur_start - (r.offset() - offset);
        }
        if offset < r.parent_end() {
            return cur_start;
        }
        parent_pos = r.parent_end();
        cur_pos = cur_start + r.bytes().len();
    }
    cur_pos + (offset - parent_pos)
}

/// The current-space span of every replacement, in order.
pub fn current_spans(replacements: &[Replacement]) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut parent_pos = 0;
    let mut cur_pos = 0;
    replacements.iter().map(move |r| {
        let cur_start = cur_pos + (r.offset() - parent_pos);
        let cur_end = cur_start + r.bytes().len();
        parent_pos = r.parent_end();
        cur_pos = cur_end;
        cur_start..cur_end
    })
}

/// Net size change of the whole list.
pub fn net_delta(replacements: &[Replacement]) -> isize {
    replacements.iter().map(Replacement::delta).sum()
}
