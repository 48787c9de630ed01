//! Edit scripts: the replacement list that turns one byte sequence into
//! another.
//!
//! The common prefix and suffix are trimmed first. Whatever remains differs
//! at both ends, and a single replacement covering it is the shortest
//! possible script: any change, however it was made, could have been made
//! by that one edit. This is what [`compute_diff`] returns.
//!
//! With [`DiffConfig::min_equal_run`] set, the residual is instead run
//! through the Myers algorithm (via `similar`) and split into one
//! replacement per hunk, a hunk being closed by a shared run of at least
//! that many bytes.

use std::ops::Range;
use std::time::Instant;

use bytes::Bytes;
use similar::{Algorithm, DiffOp};
use strata_core::{Blob, DiffBlob, Replacement};
use tracing::debug;

use crate::config::DiffConfig;
use crate::error::DiffResult;

/// Compute the shortest edit script from `before` to `after`.
///
/// Applying the result to a root blob of `before` yields `after`. Identical
/// inputs give an empty list, anything else a single replacement.
pub fn compute_diff(before: &[u8], after: &[u8]) -> Vec<Replacement> {
    script(before, after, &DiffConfig::default())
}

/// Compute the edit script from `before` to `after` under `config`.
pub fn compute_diff_with(
    before: &[u8],
    after: &[u8],
    config: &DiffConfig,
) -> DiffResult<Vec<Replacement>> {
    config.validate()?;
    Ok(script(before, after, config))
}

/// Express `after` as a diff over `parent`.
///
/// The returned diff has `parent` as its parent regardless of whether
/// `parent` is itself a diff.
pub fn diff_blob(parent: &Blob, after: &[u8]) -> DiffResult<DiffBlob> {
    diff_blob_with(parent, after, &DiffConfig::default())
}

pub fn diff_blob_with(parent: &Blob, after: &[u8], config: &DiffConfig) -> DiffResult<DiffBlob> {
    let replacements = compute_diff_with(&parent.read_all(), after, config)?;
    Ok(DiffBlob::new(parent.clone(), replacements)?)
}

/// Matching regions of the trimmed inputs that make up one replacement.
#[derive(Debug)]
struct Hunk {
    old: Range<usize>,
    new: Range<usize>,
}

fn script(before: &[u8], after: &[u8], config: &DiffConfig) -> Vec<Replacement> {
    let prefix = common_prefix(before, after);
    let suffix = common_suffix(&before[prefix..], &after[prefix..]);
    let old = &before[prefix..before.len() - suffix];
    let new = &after[prefix..after.len() - suffix];

    if old.is_empty() && new.is_empty() {
        return Vec::new();
    }

    let whole = || Hunk {
        old: 0..old.len(),
        new: 0..new.len(),
    };
    let hunks = match config.min_equal_run {
        None => vec![whole()],
        Some(_) if old.len() > config.max_window || new.len() > config.max_window => {
            debug!(
                old_len = old.len(),
                new_len = new.len(),
                max_window = config.max_window,
                "residual exceeds diff window, emitting single replacement"
            );
            vec![whole()]
        }
        Some(min_equal_run) => {
            let deadline = config.timeout.map(|t| Instant::now() + t);
            let ops = similar::capture_diff_slices_deadline(Algorithm::Myers, old, new, deadline);
            if deadline.is_some_and(|d| Instant::now() > d) {
                debug!(
                    old_len = old.len(),
                    new_len = new.len(),
                    "diff deadline expired, script may be coarser"
                );
            }
            group_hunks(&ops, min_equal_run)
        }
    };

    // Hunks always hold at least one changed byte, so none is a null edit.
    let replacements: Vec<Replacement> = hunks
        .into_iter()
        .filter_map(|h| {
            let bytes = Bytes::copy_from_slice(&new[h.new]);
            Replacement::new(prefix + h.old.start, h.old.len(), bytes).ok()
        })
        .collect();

    debug!(
        before = before.len(),
        after = after.len(),
        prefix,
        suffix,
        replacements = replacements.len(),
        "computed edit script"
    );
    replacements
}

fn group_hunks(ops: &[DiffOp], min_equal_run: usize) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;

    for op in ops {
        if let DiffOp::Equal { len, .. } = op {
            if *len >= min_equal_run {
                hunks.extend(current.take());
            }
            // A shorter run is absorbed if another change follows it.
            continue;
        }
        let (old, new) = (op.old_range(), op.new_range());
        match current.as_mut() {
            Some(hunk) => {
                hunk.old.end = old.end;
                hunk.new.end = new.end;
            }
            None => current = Some(Hunk { old, new }),
        }
    }
    hunks.extend(current);
    hunks
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::error::DiffError;

    fn init_tracing() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();
    }

    /// Apply `replacements` to a root blob of `before` and read it back.
    fn apply(before: &[u8], replacements: Vec<Replacement>) -> (usize, Vec<u8>) {
        let diff = DiffBlob::new(Blob::from_bytes(before), replacements).unwrap();
        let count = diff.count();
        (count, Blob::Diff(diff).read_all())
    }

    fn spans(rs: &[Replacement]) -> Vec<(usize, usize, &[u8])> {
        rs.iter().map(|r| (r.offset(), r.size(), r.bytes())).collect()
    }

    // -----------------------------------------------------------------------
    // Basic scripts
    // -----------------------------------------------------------------------

    #[test]
    fn identical_inputs_give_empty_script() {
        assert!(compute_diff(b"", b"").is_empty());
        assert!(compute_diff(b"Hello", b"Hello").is_empty());
    }

    #[test]
    fn single_byte_deletion() {
        let rs = compute_diff(b"a", b"");
        assert_eq!(spans(&rs), vec![(0, 1, &b""[..])]);
        assert!(rs[0].is_deletion());
        assert_eq!(apply(b"a", rs), (1, Vec::new()));
    }

    #[test]
    fn pure_insertion_in_the_middle() {
        let rs = compute_diff(b"ac", b"abc");
        assert_eq!(spans(&rs), vec![(1, 0, &b"b"[..])]);
    }

    #[test]
    fn insertion_into_repeated_run() {
        let rs = compute_diff(b"aa", b"aaa");
        assert_eq!(rs.len(), 1);
        assert_eq!(apply(b"aa", rs).1, b"aaa");
    }

    #[test]
    fn disjoint_inputs_give_one_replacement() {
        let rs = compute_diff(b"abc", b"xyz");
        assert_eq!(spans(&rs), vec![(0, 3, &b"xyz"[..])]);
    }

    #[test]
    fn separated_changes_give_one_replacement() {
        let rs = compute_diff(b"a1b2c", b"a3b4c");
        assert_eq!(spans(&rs), vec![(1, 3, &b"3b4"[..])]);
    }

    #[test]
    fn reused_source_bytes_do_not_split() {
        // [0, 3) => "b" then [3, 5) => "d"
        let rs = compute_diff(b"abcde", b"bd");
        assert_eq!(spans(&rs), vec![(0, 5, &b"bd"[..])]);
        // [0, 3) => "b"
        let rs = compute_diff(b"abc", b"b");
        assert_eq!(spans(&rs), vec![(0, 3, &b"b"[..])]);
    }

    #[test]
    fn hello_world_edits() {
        let rs = compute_diff(b"Hello World", b"HEL_lo WOrld");
        assert_eq!(spans(&rs), vec![(1, 7, &b"EL_lo WO"[..])]);
        assert_eq!(apply(b"Hello World", rs).1, b"HEL_lo WOrld");
        let rs = compute_diff(b"Hello World", b"H_110 World");
        assert_eq!(spans(&rs), vec![(1, 4, &b"_110"[..])]);
    }

    // -----------------------------------------------------------------------
    // Splitting at shared runs
    // -----------------------------------------------------------------------

    #[test]
    fn shared_run_splits_replacements() {
        let rs = compute_diff_with(b"a1b2c", b"a3b4c", &DiffConfig::splitting(1)).unwrap();
        assert_eq!(spans(&rs), vec![(1, 1, &b"3"[..]), (3, 1, &b"4"[..])]);
    }

    #[test]
    fn short_shared_runs_are_absorbed() {
        let rs = compute_diff_with(b"a1b2c", b"a3b4c", &DiffConfig::splitting(2)).unwrap();
        assert_eq!(spans(&rs), vec![(1, 3, &b"3b4"[..])]);
    }

    #[test]
    fn long_shared_runs_still_split() {
        let rs = compute_diff_with(b"a1bb2c", b"a3bb4c", &DiffConfig::splitting(2)).unwrap();
        assert_eq!(rs.len(), 2);
    }

    #[test]
    fn oversized_residual_skips_myers() {
        init_tracing();
        let config = DiffConfig {
            max_window: 2,
            ..DiffConfig::splitting(1)
        };
        let rs = compute_diff_with(b"a1b2c", b"a3b4c", &config).unwrap();
        assert_eq!(spans(&rs), vec![(1, 3, &b"3b4"[..])]);
    }

    #[test]
    fn expired_deadline_is_still_exact() {
        init_tracing();
        let config = DiffConfig {
            timeout: Some(Duration::ZERO),
            ..DiffConfig::splitting(1)
        };
        let before = b"the quick brown fox jumps over the lazy dog".repeat(4);
        let after = b"the quick red fox leaps over the lazy cat".repeat(4);
        let rs = compute_diff_with(&before, &after, &config).unwrap();
        assert_eq!(apply(&before, rs).1, after);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = compute_diff_with(b"a", b"b", &DiffConfig::splitting(0)).unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    // -----------------------------------------------------------------------
    // Blob construction
    // -----------------------------------------------------------------------

    #[test]
    fn diff_blob_over_root() {
        let parent = Blob::from_bytes(b"Hello World");
        let diff = diff_blob(&parent, b"Hello Rust World").unwrap();
        assert!(diff.parent().same_as(&parent));
        assert_eq!(diff.count(), 1);
        assert_eq!(Blob::Diff(diff).read_all(), b"Hello Rust World");
    }

    #[test]
    fn diff_blob_over_diff_parent() {
        let root = Blob::from_bytes(b"Hello World");
        let parent = root.write_bytes(0, b"J").unwrap();
        let diff = diff_blob(&parent, b"Jello!").unwrap();
        assert!(diff.parent().same_as(&parent));
        assert_eq!(Blob::Diff(diff).read_all(), b"Jello!");
    }

    #[test]
    fn diff_blob_of_identical_content_is_empty() {
        let parent = Blob::from_bytes(b"same");
        let diff = diff_blob(&parent, b"same").unwrap();
        assert_eq!(diff.count(), 0);
        assert_eq!(diff.size(), 4);
    }

    #[test]
    fn diff_blob_with_splitting() {
        let parent = Blob::from_bytes(b"a1b2c");
        let diff = diff_blob_with(&parent, b"a3b4c", &DiffConfig::splitting(1)).unwrap();
        assert_eq!(diff.count(), 2);
        assert_eq!(Blob::Diff(diff).read_all(), b"a3b4c");
    }

    // -----------------------------------------------------------------------
    // Exhaustive corpus: every composition of unit replacements
    // -----------------------------------------------------------------------

    /// One replacement of `length` characters at `start` by `text`.
    #[derive(Clone, Copy)]
    struct Unit {
        start: usize,
        length: usize,
        text: &'static str,
    }

    impl Unit {
        /// First position the following unit may start at.
        fn next(&self) -> usize {
            if self.length == 0 {
                self.start + 1
            } else {
                self.start + self.length
            }
        }
    }

    fn units_from(text: &str, from: usize, replacement: &'static str) -> Vec<Unit> {
        let mut units = Vec::new();
        for start in from..=text.len() {
            for length in 0..=text.len() - start {
                if length != 0 || !replacement.is_empty() {
                    units.push(Unit {
                        start,
                        length,
                        text: replacement,
                    });
                }
            }
        }
        units
    }

    fn compose(text: &str, units: &[Unit]) -> String {
        let mut out = text.to_string();
        let mut delta: isize = 0;
        for u in units {
            let start = (u.start as isize + delta) as usize;
            out.replace_range(start..start + u.length, u.text);
            delta += u.text.len() as isize - u.length as isize;
        }
        out
    }

    fn enumerate(text: &str, chosen: &mut Vec<Unit>, rest: &[&'static str], out: &mut Vec<String>) {
        let Some((first, rest)) = rest.split_first() else {
            out.push(compose(text, chosen));
            return;
        };
        let from = chosen.last().map_or(0, Unit::next);
        for unit in units_from(text, from, *first) {
            chosen.push(unit);
            enumerate(text, chosen, rest, out);
            chosen.pop();
        }
    }

    fn check_with(before: &str, replacements: &[&'static str], config: &DiffConfig) {
        let mut afters = Vec::new();
        enumerate(before, &mut Vec::new(), replacements, &mut afters);
        assert!(!afters.is_empty());
        for after in afters {
            let rs = compute_diff_with(before.as_bytes(), after.as_bytes(), config).unwrap();
            let (count, content) = apply(before.as_bytes(), rs);
            assert!(
                count <= replacements.len(),
                "{before:?} -> {after:?} took {count} replacements"
            );
            assert_eq!(content, after.as_bytes(), "{before:?} -> {after:?}");
        }
    }

    fn check(before: &str, replacements: &[&'static str]) {
        check_with(before, replacements, &DiffConfig::default());
    }

    #[test]
    fn corpus_single_edits() {
        for before in ["a", "ab", "abcde"] {
            for r in ["", "1", "12"] {
                check(before, &[r]);
            }
        }
    }

    #[test]
    fn corpus_double_edits() {
        for first in ["", "1", "12"] {
            for second in ["", "1", "12"] {
                check("abcde", &[first, second]);
            }
        }
    }

    #[test]
    fn corpus_reusing_source_bytes() {
        let texts = ["", "a", "b", "d", "bd", "cb", "bcd"];
        for before in ["abc", "abcde", "abab"] {
            for r in texts {
                check(before, &[r]);
            }
        }
        for first in texts {
            for second in texts {
                check("abcde", &[first, second]);
            }
        }
    }

    #[test]
    fn corpus_splitting_with_fresh_bytes() {
        // Replacement text never occurs in the source, so every shared run
        // separates two distinct edits.
        let config = DiffConfig::splitting(1);
        for first in ["", "1", "12"] {
            check_with("abcde", &[first], &config);
            for second in ["", "1", "12"] {
                check_with("abcde", &[first, second], &config);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Property tests
    // -----------------------------------------------------------------------

    fn unit_edit() -> impl Strategy<Value = (usize, usize, Vec<u8>)> {
        (0usize..24, 0usize..6, prop::collection::vec(0u8..4, 0..4))
            .prop_filter("null edit", |(_, len, bytes)| *len != 0 || !bytes.is_empty())
    }

    /// Apply current-space edits one after another, clamped to the content.
    fn model(before: &[u8], edits: &[(usize, usize, Vec<u8>)]) -> Vec<u8> {
        let mut data = before.to_vec();
        for (index, length, bytes) in edits {
            let start = (*index).min(data.len());
            let end = (start + length).min(data.len());
            let _removed: Vec<u8> = data.splice(start..end, bytes.iter().copied()).collect();
        }
        data
    }

    proptest! {
        #[test]
        fn scripts_round_trip(
            before in prop::collection::vec(0u8..4, 0..48),
            after in prop::collection::vec(0u8..4, 0..48),
        ) {
            let rs = compute_diff(&before, &after);
            prop_assert!(rs.len() <= 1);
            let (_, content) = apply(&before, rs);
            prop_assert_eq!(content, after);
        }

        #[test]
        fn composed_edits_stay_within_edit_count(
            before in prop::collection::vec(0u8..4, 0..24),
            edits in prop::collection::vec(unit_edit(), 1..3),
        ) {
            let after = model(&before, &edits);
            let rs = compute_diff(&before, &after);
            prop_assert!(rs.len() <= edits.len());
            let (_, content) = apply(&before, rs);
            prop_assert_eq!(content, after);
        }

        #[test]
        fn split_scripts_round_trip(
            before in prop::collection::vec(0u8..4, 0..48),
            after in prop::collection::vec(0u8..4, 0..48),
            min_equal_run in 1usize..6,
        ) {
            let fine = compute_diff_with(&before, &after, &DiffConfig::splitting(1)).unwrap();
            let coarse =
                compute_diff_with(&before, &after, &DiffConfig::splitting(min_equal_run)).unwrap();
            prop_assert!(coarse.len() <= fine.len());
            let (_, content) = apply(&before, coarse);
            prop_assert_eq!(content, after);
        }

        #[test]
        fn split_scripts_are_sorted_and_disjoint(
            before in prop::collection::vec(0u8..4, 0..48),
            after in prop::collection::vec(0u8..4, 0..48),
        ) {
            let rs = compute_diff_with(&before, &after, &DiffConfig::splitting(1)).unwrap();
            for pair in rs.windows(2) {
                prop_assert!(pair[0].parent_end() < pair[1].offset());
            }
        }
    }
}
