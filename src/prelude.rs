//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use rankrange::prelude::*;
//! ```

pub use crate::{
    IndexError, KdTree, KdTreeConfig, LinearScan, Point, QuadTree, QuadTreeConfig, RangeTopK, Rect, TopK,
};
