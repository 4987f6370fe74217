//! Region quadtree over a borrowed point slice.
//!
//! Points are inserted one at a time in slice order. A full leaf is split into
//! four quadrants by midpoint, but the points it already holds stay where they
//! are: only the point that triggered the split descends. Queries therefore
//! always scan a node's own points as well as its children.
//!
//! Nodes live in a single arena. The four children of a subdivided node are
//! allocated consecutively in NW, NE, SW, SE order, so a node only records the
//! arena index of its first child.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::IndexError;
use crate::geometry::{Point, Rect};
use crate::index::RangeTopK;
use crate::topk::TopK;

const ROOT: usize = 0;

/// Quadtree build parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuadTreeConfig {
    /// Points a leaf holds before it is subdivided
    pub max_points_per_leaf: usize,
    /// Depth at which leaves stop subdividing and accept any number of points
    pub max_depth: u32,
}

impl QuadTreeConfig {
    /// Default leaf capacity
    pub const DEFAULT_MAX_POINTS_PER_LEAF: usize = 32;
    /// Default depth limit
    pub const DEFAULT_MAX_DEPTH: u32 = 64;

    /// Sets the leaf capacity
    #[must_use]
    pub const fn with_max_points_per_leaf(mut self, max_points_per_leaf: usize) -> Self {
        self.max_points_per_leaf = max_points_per_leaf;
        self
    }

    /// Sets the depth limit
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_points_per_leaf: Self::DEFAULT_MAX_POINTS_PER_LEAF,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Position of a child inside its parent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Upper-left
    NorthWest,
    /// Upper-right
    NorthEast,
    /// Lower-left
    SouthWest,
    /// Lower-right
    SouthEast,
}

impl Quadrant {
    /// All quadrants in insertion precedence order
    pub const ALL: [Self; 4] = [Self::NorthWest, Self::NorthEast, Self::SouthWest, Self::SouthEast];

    const fn offset(self) -> usize {
        match self {
            Self::NorthWest => 0,
            Self::NorthEast => 1,
            Self::SouthWest => 2,
            Self::SouthEast => 3,
        }
    }
}

#[derive(Clone, Debug)]
struct QuadNode {
    bounds: Rect,
    depth: u32,
    /// Arena index of the NW child; NE, SW, SE follow it
    children: Option<usize>,
    /// Indices into the point slice, in insertion order
    items: Vec<usize>,
}

impl QuadNode {
    fn new(bounds: Rect, depth: u32) -> Self {
        Self { bounds, depth, children: None, items: Vec::new() }
    }
}

/// Static region quadtree answering top-K lowest-rank rectangle queries.
///
/// # Example
/// ```
/// use rankrange::{Point, QuadTree, QuadTreeConfig, RangeTopK, Rect};
///
/// let points = vec![
///     Point::new(0, 0, 5.0, 5.0),
///     Point::new(1, 1, 500.0, 500.0),
///     Point::new(2, 2, 5.0, 600.0),
/// ];
/// let tree = QuadTree::build(&points, Rect::new(0.0, 0.0, 1024.0, 1024.0), QuadTreeConfig::default());
///
/// let mut results = Vec::new();
/// tree.query_top_k(&Rect::new(0.0, 0.0, 10.0, 10.0), &mut results);
/// assert_eq!(results, vec![0]);
/// ```
#[derive(Clone, Debug)]
pub struct QuadTree<'a> {
    points: &'a [Point],
    nodes: Vec<QuadNode>,
    config: QuadTreeConfig,
    len: usize,
    dropped: usize,
}

impl<'a> QuadTree<'a> {
    /// Builds a quadtree over `points` rooted at `bounds`.
    ///
    /// Points are inserted in slice order. A point outside `bounds` is
    /// skipped; the number skipped is reported by [`dropped`](Self::dropped)
    /// and logged as a warning.
    ///
    /// Infinite edges cannot be split at a midpoint, so unbounded `bounds` are
    /// narrowed to the finite points they contain before building. Points with
    /// a non-finite coordinate are then skipped as well.
    pub fn build(points: &'a [Point], bounds: Rect, config: QuadTreeConfig) -> Self {
        let bounds = if bounds.is_valid() && !bounds.is_finite() {
            let narrowed = Rect::enclosing(points).map_or_else(Rect::default, |e| e.intersection(&bounds));
            debug!(?bounds, ?narrowed, "quadtree narrowed unbounded root");
            narrowed
        } else {
            bounds
        };
        let mut tree = Self::empty(points, bounds, config);
        for index in 0..points.len() {
            if !tree.insert(index) {
                tree.dropped += 1;
            }
        }
        if tree.dropped > 0 {
            warn!(dropped = tree.dropped, ?bounds, "quadtree skipped points it could not place");
        }
        tree.log_built();
        tree
    }

    /// Builds a quadtree, failing on the first point that cannot be placed.
    ///
    /// # Errors
    /// [`IndexError::InvalidBounds`] when `bounds` is inverted, NaN or
    /// infinite, and [`IndexError::OutOfBounds`] for the first point outside
    /// `bounds`.
    pub fn try_build(points: &'a [Point], bounds: Rect, config: QuadTreeConfig) -> Result<Self, IndexError> {
        if !bounds.is_valid() || !bounds.is_finite() {
            return Err(IndexError::InvalidBounds { bounds });
        }
        let mut tree = Self::empty(points, bounds, config);
        for (index, p) in points.iter().enumerate() {
            if !tree.insert(index) {
                return Err(IndexError::OutOfBounds { index, x: p.x, y: p.y });
            }
        }
        tree.log_built();
        Ok(tree)
    }

    fn empty(points: &'a [Point], bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            points,
            nodes: vec![QuadNode::new(bounds, 0)],
            config,
            len: 0,
            dropped: 0,
        }
    }

    fn log_built(&self) {
        debug!(
            points = self.len,
            nodes = self.nodes.len(),
            height = self.height(),
            "quadtree built"
        );
    }

    /// Places the point at `index`, returning false when no node contains it
    fn insert(&mut self, index: usize) -> bool {
        let points = self.points;
        let point = &points[index];
        if !self.nodes[ROOT].bounds.contains_point(point) {
            return false;
        }

        let mut current = ROOT;
        loop {
            if let Some(first) = self.nodes[current].children {
                match (first..first + 4).find(|&c| self.nodes[c].bounds.contains_point(point)) {
                    Some(child) => {
                        current = child;
                        continue;
                    }
                    None => return false,
                }
            }

            let node = &mut self.nodes[current];
            if node.items.len() < self.config.max_points_per_leaf || node.depth >= self.config.max_depth {
                node.items.push(index);
                self.len += 1;
                return true;
            }
            // Existing items stay on this node; the loop retries the new point against the children
            self.subdivide(current);
        }
    }

    fn subdivide(&mut self, id: usize) {
        let first = self.nodes.len();
        let depth = self.nodes[id].depth + 1;
        let quadrants = self.nodes[id].bounds.quadrants();
        for quadrant in quadrants {
            self.nodes.push(QuadNode::new(quadrant, depth));
        }
        self.nodes[id].children = Some(first);
    }

    /// Offers every point of the subtree rooted at `id`, without geometric tests
    fn collect_subtree(&self, start: usize, top: &mut TopK) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            // Items are in insertion order, not rank order: no early exit here
            for &i in &node.items {
                top.offer(i, &self.points[i]);
            }
            if let Some(first) = node.children {
                stack.extend((first..first + 4).rev());
            }
        }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no point was indexed
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points skipped by [`build`](Self::build) because they fell outside the root bounds
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Root bounds
    pub fn bounds(&self) -> Rect {
        self.nodes[ROOT].bounds
    }

    /// Build parameters
    pub fn config(&self) -> QuadTreeConfig {
        self.config
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node (0 for a lone root)
    pub fn height(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Read-only view of the root node
    pub fn root(&self) -> QuadNodeView<'_> {
        QuadNodeView { tree: self, id: ROOT }
    }

    /// Every node, parents before their children
    pub fn nodes(&self) -> impl Iterator<Item = QuadNodeView<'_>> {
        (0..self.nodes.len()).map(move |id| QuadNodeView { tree: self, id })
    }
}

impl RangeTopK for QuadTree<'_> {
    fn points(&self) -> &[Point] {
        self.points
    }

    fn search(&self, query: &Rect, top: &mut TopK) {
        if !query.is_valid() {
            return;
        }
        let mut visited = 0usize;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            visited += 1;
            let node = &self.nodes[id];
            if query.contains(&node.bounds) {
                self.collect_subtree(id, top);
            } else if node.bounds.intersects(query) {
                for &i in &node.items {
                    let p = &self.points[i];
                    if query.contains_point(p) {
                        top.offer(i, p);
                    }
                }
                if let Some(first) = node.children {
                    stack.extend((first..first + 4).rev());
                }
            }
        }
        trace!(visited, kept = top.len(), "quadtree query");
    }
}

/// Read-only handle on one quadtree node
#[derive(Clone, Copy)]
pub struct QuadNodeView<'t> {
    tree: &'t QuadTree<'t>,
    id: usize,
}

impl<'t> QuadNodeView<'t> {
    fn node(&self) -> &'t QuadNode {
        &self.tree.nodes[self.id]
    }

    /// Distance from the root
    pub fn depth(&self) -> u32 {
        self.node().depth
    }

    /// Region covered by the node
    pub fn bounds(&self) -> Rect {
        self.node().bounds
    }

    /// Whether the node was never subdivided
    pub fn is_leaf(&self) -> bool {
        self.node().children.is_none()
    }

    /// Indices of the points attached directly to this node, in insertion order
    pub fn point_indices(&self) -> &'t [usize] {
        &self.node().items
    }

    /// Points attached directly to this node, in insertion order
    pub fn points(&self) -> impl Iterator<Item = &'t Point> + use<'t> {
        let points = self.tree.points;
        self.node().items.iter().map(move |&i| &points[i])
    }

    /// The four children in NW, NE, SW, SE order, `None` for a leaf
    pub fn children(&self) -> Option<[Self; 4]> {
        let tree = self.tree;
        self.node().children.map(|first| Quadrant::ALL.map(|q| Self { tree, id: first + q.offset() }))
    }

    /// One child, `None` for a leaf
    pub fn child(&self, quadrant: Quadrant) -> Option<Self> {
        self.node().children.map(|first| Self { tree: self.tree, id: first + quadrant.offset() })
    }
}

impl fmt::Debug for QuadNodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadNodeView")
            .field("id", &self.id)
            .field("depth", &self.depth())
            .field("bounds", &self.bounds())
            .field("points", &self.point_indices().len())
            .field("leaf", &self.is_leaf())
            .finish_non_exhaustive()
    }
}
