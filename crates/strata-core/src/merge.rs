//! Folding edits into a flat replacement list.
//!
//! [`apply_edit`] takes a diff's replacement list (parent space) and a new
//! edit addressed in the diff's current space, and produces the replacement
//! list of the resulting diff, still in the *same* parent space. This keeps
//! diff chains flat: a write to a diff never wraps it in another diff.
//!
//! # Rules
//!
//! - Replacements whose current-space span neither touches nor overlaps the
//!   edit are kept as they are.
//! - Replacements that overlap, nest in, contain, or merely touch the edit
//!   (a shared boundary counts) are absorbed, together with the edit, into a
//!   single replacement spanning their union. The edit wins wherever it
//!   overlaps.
//! - A merged replacement that cancels out (removes nothing, inserts
//!   nothing) is dropped.
//!
//! [`combine_siblings`] unions two lists that already share a parent space.

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::error::{BlobError, BlobResult};
use crate::remap;
use crate::replacement::Replacement;

/// An edit addressed in current space.
///
/// Unlike [`Replacement`] this is never stored; it only describes what a
/// caller asked for before it is folded into a list. The span
/// `offset..offset + length` must lie within the current content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub length: usize,
    pub bytes: Bytes,
}

impl Edit {
    fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Fold `edit` into `replacements`, returning the new sorted,
/// non-overlapping, non-adjacent list.
pub fn apply_edit(replacements: &[Replacement], edit: &Edit) -> Vec<Replacement> {
    let start = edit.offset;
    let end = edit.end();

    // Index range of touching replacements plus the current-space start of
    // the first and end of the last one.
    let mut touching: Option<(usize, usize, usize, usize)> = None;
    let mut first_after = replacements.len();

    for (i, span) in remap::current_spans(replacements).enumerate() {
        if span.end < start {
            continue;
        }
        if span.start > end {
            first_after = i;
            break;
        }
        touching = match touching {
            None => Some((i, i, span.start, span.end)),
            Some((first, _, cur_start, _)) => Some((first, i, cur_start, span.end)),
        };
    }

    let mut out = Vec::with_capacity(replacements.len() + 1);
    let merged = match touching {
        None => {
            out.extend_from_slice(&replacements[..first_after]);
            let offset = remap::to_parent_space(start, replacements);
            Replacement::new(offset, edit.length, edit.bytes.clone()).ok()
        }
        Some((first, last, cur_start, cur_end)) => {
            out.extend_from_slice(&replacements[..first]);
            let head = &replacements[first];
            let tail = &replacements[last];

            let parent_start = if start < cur_start {
                remap::to_parent_space(start, replacements)
            } else {
                head.offset()
            };
            let parent_end = if end > cur_end {
                remap::to_parent_space(end, replacements)
            } else {
                tail.parent_end()
            };

            let keep_left = cur_start.max(start) - cur_start;
            let keep_right = cur_end - cur_end.min(end);
            let mut buf = BytesMut::with_capacity(keep_left + edit.bytes.len() + keep_right);
            buf.extend_from_slice(&head.bytes()[..keep_left]);
            buf.extend_from_slice(&edit.bytes);
            buf.extend_from_slice(&tail.bytes()[tail.bytes().len() - keep_right..]);

            trace!(
                absorbed = last - first + 1,
                parent_start,
                parent_end,
                "merged edit with existing replacements"
            );
            Replacement::new(parent_start, parent_end - parent_start, buf.freeze()).ok()
        }
    };

    let resume = match touching {
        Some((_, last, _, _)) => last + 1,
        None => first_after,
    };
    out.extend(merged);
    out.extend_from_slice(&replacements[resume..]);
    trace!(offset = start, length = edit.length, count = out.len(), "applied edit");
    out
}

/// Union two replacement lists expressed over the same parent.
///
/// Entries present in both lists are kept once. Entries that touch are
/// coalesced into one. Overlapping entries, or two insertions at the same
/// offset, have no well-defined order and are rejected.
pub fn combine_siblings(
    left: &[Replacement],
    right: &[Replacement],
) -> BlobResult<Vec<Replacement>> {
    let mut all: Vec<&Replacement> = left.iter().chain(right.iter()).collect();
    all.sort_by_key(|r| (r.offset(), r.parent_end()));

    let mut out: Vec<Replacement> = Vec::with_capacity(all.len());
    for r in all {
        if let Some(prev) = out.last_mut() {
            if *prev == *r {
                continue;
            }
            if r.offset() < prev.parent_end() {
                return Err(BlobError::IncompatibleMerge(format!(
                    "{prev:?} overlaps {r:?}"
                )));
            }
            if r.offset() == prev.parent_end() {
                if prev.is_insertion() && r.is_insertion() {
                    return Err(BlobError::IncompatibleMerge(format!(
                        "ambiguous insertions at offset {}",
                        r.offset()
                    )));
                }
                let mut buf = BytesMut::with_capacity(prev.bytes().len() + r.bytes().len());
                buf.extend_from_slice(prev.bytes());
                buf.extend_from_slice(r.bytes());
                *prev = Replacement::new(prev.offset(), prev.size() + r.size(), buf.freeze())?;
                continue;
            }
        }
        out.push(r.clone());
    }
    Ok(out)
}
