//! Error types for blob operations.

/// Errors that can occur while reading, editing or combining blobs.
///
/// Every error reflects a caller contract violation. None of them are
/// transient, and a failed operation leaves every existing blob untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// A read touched bytes outside `[0, size)`.
    #[error("out of bounds: {length} byte(s) at index {index} in blob of size {size}")]
    OutOfBounds {
        index: usize,
        length: usize,
        size: usize,
    },

    /// A replacement that neither removes nor inserts anything.
    #[error("invalid replacement at offset {offset}: zero length and no bytes")]
    InvalidReplacement { offset: usize },

    /// Two replacements handed to the bulk constructor overlap or are out of order.
    #[error("overlapping replacements: offset {offset} starts before previous end {previous_end}")]
    Overlapping { previous_end: usize, offset: usize },

    /// The two blobs have no shared-parent or parent-child relationship,
    /// or their edits collide.
    #[error("incompatible merge: {0}")]
    IncompatibleMerge(String),

    /// An elastic write would grow the blob beyond its maximum size.
    #[error("capacity exceeded: writing {length} byte(s) at index {index}")]
    CapacityExceeded { index: usize, length: usize },

    /// A value does not fit the layout it is being written through.
    #[error("layout mismatch: expected {expected} byte(s), got {actual}")]
    LayoutMismatch { expected: usize, actual: usize },
}

/// Convenience alias for blob results.
pub type BlobResult<T> = Result<T, BlobError>;
