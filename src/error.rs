//! Build errors.

use thiserror::Error;

use crate::geometry::Rect;

/// Errors reported by the fallible index builders.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IndexError {
    /// The root bounds are inverted or carry a NaN bound
    #[error("invalid index bounds: ({}, {}) to ({}, {})", bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y)]
    InvalidBounds {
        /// The rejected bounds
        bounds: Rect,
    },

    /// A point lies outside the root bounds and cannot be indexed
    #[error("point {index} at ({x}, {y}) lies outside the index bounds")]
    OutOfBounds {
        /// Position of the point in the input slice
        index: usize,
        /// X coordinate of the point
        x: f64,
        /// Y coordinate of the point
        y: f64,
    },

    /// A point has a NaN or infinite coordinate
    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the point in the input slice
        index: usize,
    },
}
