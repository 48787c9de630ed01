//! Immutable, elastic binary blobs for Strata.
//!
//! A blob is a byte sequence that is never modified in place. Writing to a
//! blob produces a new blob that shares storage with the old one, which
//! makes "what-if" edits and versioned snapshots cheap.
//!
//! # Key Types
//!
//! - [`Blob`] -- the blob value: either a root or a diff
//! - [`RootBlob`] -- raw bytes, the base of every lineage
//! - [`DiffBlob`] -- a parent blob plus a flat, sorted replacement list
//! - [`Replacement`] -- one `(offset, length, bytes)` substitution
//! - [`Layout`] / [`StaticLayout`] -- typed views used by schema layers
//!
//! # Design Rules
//!
//! 1. Blobs are immutable values; every write returns a new blob.
//! 2. Diff chains are flat: writing to a diff merges into its own list and
//!    keeps its parent, so `parent()` always names the lineage base.
//! 3. Replacements in a list are sorted and never overlap. Edits that touch
//!    or overlap existing replacements are coalesced into one.
//! 4. Reads are bounds-checked; writes are elastic.
//! 5. Blobs are `Send + Sync`; parents are shared through `Arc`.

pub mod blob;
pub mod diff;
pub mod error;
pub mod layout;
pub mod merge;
pub mod remap;
pub mod replacement;
pub mod root;

// Re-export primary types at crate root for ergonomic imports.
pub use blob::{Blob, MAX_SIZE};
pub use diff::DiffBlob;
pub use error::{BlobError, BlobResult};
pub use layout::{FixedBytes, Layout, StaticLayout, I16, I32, I8};
pub use merge::{apply_edit, combine_siblings, Edit};
pub use remap::{locate, to_current_space, to_parent_space, Location};
pub use replacement::Replacement;
pub use root::RootBlob;
