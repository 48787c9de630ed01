//! Aggregate statistics over an edit script.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::{DiffBlob, Replacement};

use crate::edit_script::compute_diff;

/// How much an edit script changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Number of replacements in the script.
    pub replacements: usize,
    /// Bytes of the original covered by replacements.
    pub bytes_removed: usize,
    /// Bytes written in their place.
    pub bytes_inserted: usize,
}

impl DiffSummary {
    pub fn of(replacements: &[Replacement]) -> Self {
        replacements
            .iter()
            .fold(Self::default(), |acc, r| Self {
                replacements: acc.replacements + 1,
                bytes_removed: acc.bytes_removed + r.size(),
                bytes_inserted: acc.bytes_inserted + r.bytes().len(),
            })
    }

    /// Summarize the edit script from `before` to `after`.
    pub fn between(before: &[u8], after: &[u8]) -> Self {
        Self::of(&compute_diff(before, after))
    }

    /// Returns `true` if the script changes nothing.
    pub fn is_empty(&self) -> bool {
        self.replacements == 0
    }

    /// Size of the result minus size of the original.
    pub fn net_change(&self) -> isize {
        self.bytes_inserted as isize - self.bytes_removed as isize
    }
}

impl From<&DiffBlob> for DiffSummary {
    fn from(diff: &DiffBlob) -> Self {
        Self::of(diff.replacements())
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} replacement(s), -{} +{} bytes",
            self.replacements, self.bytes_removed, self.bytes_inserted
        )
    }
}

#[cfg(test)]
mod tests {
    use strata_core::Blob;

    use super::*;

    #[test]
    fn identical_content() {
        let s = DiffSummary::between(b"same", b"same");
        assert!(s.is_empty());
        assert_eq!(s.net_change(), 0);
        assert_eq!(s, DiffSummary::default());
    }

    #[test]
    fn counts_removed_and_inserted() {
        let s = DiffSummary::between(b"a1b2c", b"a33bc");
        assert_eq!(s.replacements, 1);
        assert_eq!(s.bytes_removed, 3);
        assert_eq!(s.bytes_inserted, 3);
        assert_eq!(s.net_change(), 0);
        assert_eq!(s.to_string(), "1 replacement(s), -3 +3 bytes");
    }

    #[test]
    fn split_script_summary() {
        let rs = crate::compute_diff_with(b"a1b2c", b"a33bc", &crate::DiffConfig::splitting(1))
            .unwrap();
        let s = DiffSummary::of(&rs);
        assert_eq!(s.replacements, 2);
        assert_eq!(s.bytes_removed, 2);
        assert_eq!(s.bytes_inserted, 2);
        assert_eq!(s.to_string(), "2 replacement(s), -2 +2 bytes");
    }

    #[test]
    fn deletion_only() {
        let s = DiffSummary::between(b"Hello World", b"Hello");
        assert_eq!(s.replacements, 1);
        assert_eq!(s.net_change(), -6);
    }

    #[test]
    fn from_written_blob() {
        let blob = Blob::from_bytes(b"Hello World")
            .replace_bytes(1, 2, b"EL_")
            .unwrap()
            .write_bytes(7, b"WO")
            .unwrap();
        let s = DiffSummary::from(blob.as_diff().unwrap());
        assert_eq!(s.replacements, 2);
        assert_eq!(s.bytes_removed, 4);
        assert_eq!(s.bytes_inserted, 5);
        assert_eq!(s.net_change(), 1);
    }

    #[test]
    fn json_shape() {
        let s = DiffSummary {
            replacements: 1,
            bytes_removed: 3,
            bytes_inserted: 0,
        };
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json["bytes_removed"], 3);
        let back: DiffSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }
}
