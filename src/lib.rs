//! # rankrange - top-K rectangle queries over ranked 2D points
//!
//! Static spatial indexes that answer one kind of query: *given an
//! axis-aligned rectangle, return the K points inside it with the lowest
//! rank*. Lower rank means higher priority; K is 20 by default.
//!
//! ## Features
//!
//! - **Region quadtree** ([`QuadTree`]): midpoint subdivision with a leaf
//!   capacity and depth limit
//! - **Kd-tree** ([`KdTree`]): alternating-axis median partition with
//!   rank-sorted leaves, enabling early exit during scans
//! - **Shared collector** ([`TopK`]): a bounded max-heap used by every strategy,
//!   so results are directly comparable
//! - **Reference scan** ([`LinearScan`]): brute force, for validation
//! - **Read-only traversal**: node views expose depth, bounds, points and
//!   children for visualization
//!
//! ## Quick Start
//!
//! ```rust
//! use rankrange::prelude::*;
//!
//! let points = vec![
//!     Point::new(0, 0, 5.0, 5.0),
//!     Point::new(1, 1, 500.0, 500.0),
//!     Point::new(2, 2, 5.0, 600.0),
//! ];
//! let bounds = Rect::new(0.0, 0.0, 1024.0, 1024.0);
//!
//! let quad = QuadTree::build(&points, bounds, QuadTreeConfig::default());
//! let kd = KdTree::build(&points, bounds, KdTreeConfig::default())?;
//!
//! // Query a rectangle; results are point indices in ascending rank order
//! let query = Rect::new(0.0, 0.0, 10.0, 600.0);
//! let mut results = Vec::new();
//! quad.query_top_k(&query, &mut results);
//! assert_eq!(results, vec![0, 2]);
//!
//! // The results vector is cleared by every query
//! kd.query_top_k(&query, &mut results);
//! assert_eq!(results, vec![0, 2]);
//! # Ok::<(), rankrange::IndexError>(())
//! ```
//!
//! ## How It Works
//!
//! Both trees record bounds for every node. A query that fully contains a
//! node's bounds streams the whole subtree into the collector without any
//! per-point test; a query that merely overlaps a node tests the node's own
//! points and descends; a disjoint node is pruned.
//!
//! The trees borrow the point slice for their whole lifetime and refer to
//! points by index, so results are indices into the slice that was indexed.

pub mod error;
pub mod geometry;
pub mod index;
pub mod kdtree;
pub mod prelude;
pub mod quadtree;
pub mod scan;
pub mod topk;

#[cfg(test)]
mod component_tests;

pub use error::IndexError;
pub use geometry::{Axis, Point, Rect};
pub use index::RangeTopK;
pub use kdtree::{KdNodeView, KdTree, KdTreeConfig};
pub use quadtree::{QuadNodeView, QuadTree, QuadTreeConfig, Quadrant};
pub use scan::LinearScan;
pub use topk::{DEFAULT_K, TopK};
