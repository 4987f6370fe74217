//! Brute-force reference strategy.

use crate::geometry::{Point, Rect};
use crate::index::RangeTopK;
use crate::topk::TopK;

/// Linear scan over the whole point slice.
///
/// O(n) per query; exists to validate and benchmark the tree indexes.
#[derive(Clone, Copy, Debug)]
pub struct LinearScan<'a> {
    points: &'a [Point],
}

impl<'a> LinearScan<'a> {
    /// Wraps `points` without copying
    pub const fn new(points: &'a [Point]) -> Self {
        Self { points }
    }

    /// Number of points scanned per query
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there is nothing to scan
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl RangeTopK for LinearScan<'_> {
    fn points(&self) -> &[Point] {
        self.points
    }

    fn search(&self, query: &Rect, top: &mut TopK) {
        if !query.is_valid() {
            return;
        }
        for (i, p) in self.points.iter().enumerate() {
            if query.contains_point(p) {
                top.offer(i, p);
            }
        }
    }
}
