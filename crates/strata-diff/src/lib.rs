//! Edit-script engine for Strata.
//!
//! Computes the replacement list that turns one byte sequence into another,
//! and uses it to express new content as a [`DiffBlob`] over an existing
//! blob.
//!
//! # Key Types
//!
//! - [`compute_diff`] / [`compute_diff_with`] -- shortest and run-split edit scripts
//! - [`diff_blob`] -- content expressed as a diff over a parent blob
//! - [`DiffConfig`] -- run splitting, window and deadline settings
//! - [`DiffSummary`] -- replacement and byte counts for a script
//!
//! [`DiffBlob`]: strata_core::DiffBlob

pub mod config;
pub mod edit_script;
pub mod error;
pub mod summary;

pub use config::DiffConfig;
pub use edit_script::{compute_diff, compute_diff_with, diff_blob, diff_blob_with};
pub use error::{DiffError, DiffResult};
pub use summary::DiffSummary;
