//! FILENAME: grid/src/error.rs

use thiserror::Error;

use crate::axis::Axis;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Unsupported dimension {0} (expected 1, 2 or 3 axes)")]
    UnsupportedDimension(usize),

    #[error("Axis {axis} needs at least 2 edges, got {found}")]
    TooFewEdges { axis: Axis, found: usize },

    #[error("Axis {axis} edges are not strictly increasing at index {index}")]
    UnsortedEdges { axis: Axis, index: usize },

    #[error("Expected {expected} bin contents, got {found}")]
    ContentLength { expected: usize, found: usize },

    #[error("Give either symmetric errors or both errors_up and errors_low")]
    ConflictingErrors,

    #[error("Expected {expected} bin errors, got {found}")]
    ErrorLength { expected: usize, found: usize },
}
