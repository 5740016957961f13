//! Errors returned by [`SkipSet`][crate::SkipSet] operations.
//!
//! Inserting a duplicate or removing an absent value is not an error; those
//! are reported through the `bool` returned by the operation.

use thiserror::Error;

/// Errors that can occur when copying the contents of a
/// [`SkipSet`][crate::SkipSet] into a caller-provided slice.
///
/// Every condition is checked before anything is written, so on error both
/// the set and the destination are left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CopyError {
    /// No destination was provided.
    #[error("destination is missing.")]
    MissingDestination,
    /// The start index is negative.
    #[error("start index {index} is negative.")]
    NegativeIndex {
        /// The offending start index.
        index: isize,
    },
    /// The start index lies beyond the end of the destination.
    #[error("start index {index} is beyond the end of a destination of length {len}.")]
    IndexOutOfBounds {
        /// The offending start index.
        index: usize,
        /// The length of the destination.
        len: usize,
    },
    /// The destination cannot hold every element from the start index on.
    #[error("insufficient space: {required} elements to copy but only {available} slots left.")]
    InsufficientCapacity {
        /// The number of elements in the set.
        required: usize,
        /// The slots remaining in the destination from the start index.
        available: usize,
    },
}
