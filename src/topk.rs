//! Bounded best-rank collector shared by every search strategy.
//!
//! [`TopK`] keeps the K lowest-rank points offered so far in a max-heap keyed
//! by rank, so the worst retained point is always at the top and can be
//! compared against (and evicted by) a better candidate in O(log K).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::Point;

/// Number of results a query returns by default
pub const DEFAULT_K: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    rank: i32,
    index: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank).then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-capacity collector of the lowest-rank points.
///
/// Points are identified by their index in the slice the index was built
/// from; the collector never stores the points themselves.
///
/// # Example
/// ```
/// use rankrange::{Point, TopK};
///
/// let points = [Point::new(0, 7, 0.0, 0.0), Point::new(1, 3, 1.0, 1.0), Point::new(2, 5, 2.0, 2.0)];
/// let mut top = TopK::with_capacity(2);
/// for (i, p) in points.iter().enumerate() {
///     top.offer(i, p);
/// }
/// assert_eq!(top.snapshot(), vec![1, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct TopK {
    heap: BinaryHeap<Entry>,
    capacity: usize,
    offered: usize,
    accepted: usize,
}

impl TopK {
    /// Creates a collector holding at most [`DEFAULT_K`] points
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_K)
    }

    /// Creates a collector holding at most `capacity` points.
    ///
    /// A capacity of zero retains nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
            offered: 0,
            accepted: 0,
        }
    }

    /// Offers the point stored at `index`.
    ///
    /// Below capacity the point is always kept. At capacity it replaces the
    /// worst held point only when its rank is strictly lower. Returns whether
    /// the point was kept.
    #[inline]
    pub fn offer(&mut self, index: usize, point: &Point) -> bool {
        self.offered += 1;
        let entry = Entry { rank: point.rank, index };
        if self.heap.len() < self.capacity {
            self.heap.push(entry);
            self.accepted += 1;
            return true;
        }
        match self.heap.peek_mut() {
            Some(mut worst) if point.rank < worst.rank => {
                *worst = entry;
                self.accepted += 1;
                true
            }
            _ => false,
        }
    }

    /// Held indices in ascending rank order
    pub fn snapshot(&self) -> Vec<usize> {
        let mut entries: Vec<Entry> = self.heap.iter().copied().collect();
        entries.sort_unstable();
        entries.into_iter().map(|e| e.index).collect()
    }

    /// Consumes the collector, returning held indices in ascending rank order
    pub fn into_sorted(self) -> Vec<usize> {
        self.heap.into_sorted_vec().into_iter().map(|e| e.index).collect()
    }

    /// Rank of the worst held point
    pub fn worst_rank(&self) -> Option<i32> {
        self.heap.peek().map(|e| e.rank)
    }

    /// Number of held points
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is held
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether the collector is at capacity
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Maximum number of held points
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of `offer` calls since creation or the last [`clear`](Self::clear)
    pub fn offered(&self) -> usize {
        self.offered
    }

    /// Number of offers that were kept (including later-evicted ones)
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Drops all held points and resets the counters
    pub fn clear(&mut self) {
        self.heap.clear();
        self.offered = 0;
        self.accepted = 0;
    }
}

impl Default for TopK {
    fn default() -> Self {
        Self::new()
    }
}
