//! Two-dimensional kd-tree over a borrowed point slice.
//!
//! The tree is built top-down in one pass. Each internal node keeps exactly
//! one point, the median of its subset along the split axis (x on even
//! depths, y on odd depths), and hands the lower and upper halves to its
//! children with the node bounds clipped at the median coordinate. Once the
//! depth limit is reached a node keeps all of its remaining points, sorted by
//! ascending rank.
//!
//! Every node's point list is therefore rank-sorted (a single point is sorted
//! trivially), which lets a query stop scanning a node as soon as the
//! collector rejects one of its points.

use std::fmt;

use tracing::{debug, trace};

use crate::error::IndexError;
use crate::geometry::{Axis, Point, Rect};
use crate::index::RangeTopK;
use crate::topk::TopK;

const ROOT: usize = 0;

/// Kd-tree build parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdTreeConfig {
    /// Depth at which nodes stop splitting and keep all remaining points
    pub max_depth: u32,
}

impl KdTreeConfig {
    /// Default depth limit
    pub const DEFAULT_MAX_DEPTH: u32 = 8;

    /// Sets the depth limit
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self { max_depth: Self::DEFAULT_MAX_DEPTH }
    }
}

#[derive(Clone, Debug)]
struct KdNode {
    bounds: Rect,
    depth: u32,
    /// Range of `KdTree::order` holding this node's points
    start: usize,
    end: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Static kd-tree answering top-K lowest-rank rectangle queries.
///
/// # Example
/// ```
/// use rankrange::{KdTree, KdTreeConfig, Point, RangeTopK, Rect};
///
/// let points: Vec<Point> = (0..25)
///     .map(|i| Point::new(i, 24 - i as i32, f64::from(i), f64::from(i)))
///     .collect();
/// let tree = KdTree::from_points(&points, KdTreeConfig::default())?;
///
/// let found = tree.query_points(&Rect::new(0.0, 0.0, 100.0, 100.0));
/// assert_eq!(found.len(), 20);
/// assert_eq!(found[0].rank, 0);
/// # Ok::<(), rankrange::IndexError>(())
/// ```
#[derive(Clone, Debug)]
pub struct KdTree<'a> {
    points: &'a [Point],
    /// Permutation of point indices; node ranges slice into it
    order: Vec<usize>,
    nodes: Vec<KdNode>,
    bounds: Rect,
    config: KdTreeConfig,
}

impl<'a> KdTree<'a> {
    /// Builds a kd-tree over `points` rooted at `bounds`.
    ///
    /// Every point must lie inside `bounds`: the containment shortcut used by
    /// queries trusts node bounds to cover their whole subtree.
    ///
    /// # Errors
    /// [`IndexError::InvalidBounds`] when `bounds` is inverted, NaN or infinite,
    /// [`IndexError::NonFiniteCoordinate`] for a NaN or infinite coordinate and
    /// [`IndexError::OutOfBounds`] for a point outside `bounds`.
    pub fn build(points: &'a [Point], bounds: Rect, config: KdTreeConfig) -> Result<Self, IndexError> {
        if !bounds.is_valid() || !bounds.is_finite() {
            return Err(IndexError::InvalidBounds { bounds });
        }
        for (index, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(IndexError::NonFiniteCoordinate { index });
            }
            if !bounds.contains_point(p) {
                return Err(IndexError::OutOfBounds { index, x: p.x, y: p.y });
            }
        }

        let mut tree = Self {
            points,
            order: (0..points.len()).collect(),
            nodes: Vec::new(),
            bounds,
            config,
        };
        if !points.is_empty() {
            tree.build_node(0, points.len(), bounds, 0);
        }
        debug!(
            points = points.len(),
            nodes = tree.nodes.len(),
            height = tree.height(),
            "kd-tree built"
        );
        Ok(tree)
    }

    /// Builds a kd-tree rooted at the tightest rectangle enclosing `points`.
    ///
    /// # Errors
    /// [`IndexError::NonFiniteCoordinate`] for a NaN or infinite coordinate.
    pub fn from_points(points: &'a [Point], config: KdTreeConfig) -> Result<Self, IndexError> {
        let bounds = Rect::enclosing(points).unwrap_or_default();
        Self::build(points, bounds, config)
    }

    /// Builds the node for `order[start..end]` (non-empty) and returns its arena index
    fn build_node(&mut self, start: usize, end: usize, bounds: Rect, depth: u32) -> usize {
        let id = self.nodes.len();
        self.nodes.push(KdNode { bounds, depth, start, end, left: None, right: None });

        let len = end - start;
        if len == 1 {
            return id;
        }

        let points = self.points;
        if depth >= self.config.max_depth {
            self.order[start..end].sort_unstable_by_key(|&i| points[i].rank);
            return id;
        }

        let axis = Axis::for_depth(depth);
        let half = len / 2;
        self.order[start..end]
            .select_nth_unstable_by(half, |&a, &b| points[a].coord(axis).total_cmp(&points[b].coord(axis)));
        let mid = start + half;
        let split = points[self.order[mid]].coord(axis);

        self.nodes[id].start = mid;
        self.nodes[id].end = mid + 1;
        if mid > start {
            let left = self.build_node(start, mid, bounds.clip_max(axis, split), depth + 1);
            self.nodes[id].left = Some(left);
        }
        if mid + 1 < end {
            let right = self.build_node(mid + 1, end, bounds.clip_min(axis, split), depth + 1);
            self.nodes[id].right = Some(right);
        }
        id
    }

    fn node_items(&self, node: &KdNode) -> &[usize] {
        &self.order[node.start..node.end]
    }

    /// Offers the subtree rooted at `start` without geometric tests
    fn collect_subtree(&self, start: usize, top: &mut TopK) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            for &i in self.node_items(node) {
                if !top.offer(i, &self.points[i]) {
                    break;
                }
            }
            stack.extend(node.right);
            stack.extend(node.left);
        }
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Root bounds
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Build parameters
    pub fn config(&self) -> KdTreeConfig {
        self.config
    }

    /// Number of nodes (0 for an empty tree)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node (0 for an empty tree or a lone root)
    pub fn height(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Read-only view of the root node, `None` for an empty tree
    pub fn root(&self) -> Option<KdNodeView<'_>> {
        (!self.nodes.is_empty()).then_some(KdNodeView { tree: self, id: ROOT })
    }

    /// Every node in pre-order (node, left subtree, right subtree)
    pub fn nodes(&self) -> impl Iterator<Item = KdNodeView<'_>> {
        (0..self.nodes.len()).map(move |id| KdNodeView { tree: self, id })
    }
}

impl RangeTopK for KdTree<'_> {
    fn points(&self) -> &[Point] {
        self.points
    }

    fn search(&self, query: &Rect, top: &mut TopK) {
        if !query.is_valid() || self.nodes.is_empty() {
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
                for &i in self.node_items(node) {
                    let p = &self.points[i];
                    // Later points of a rank-sorted list cannot beat a rejected one
                    if query.contains_point(p) && !top.offer(i, p) {
                        break;
                    }
                }
                stack.extend(node.right);
                stack.extend(node.left);
            }
        }
        trace!(visited, kept = top.len(), "kd-tree query");
    }
}

/// Read-only handle on one kd-tree node
#[derive(Clone, Copy)]
pub struct KdNodeView<'t> {
    tree: &'t KdTree<'t>,
    id: usize,
}

impl<'t> KdNodeView<'t> {
    fn node(&self) -> &'t KdNode {
        &self.tree.nodes[self.id]
    }

    /// Distance from the root
    pub fn depth(&self) -> u32 {
        self.node().depth
    }

    /// Region covered by the node's subtree
    pub fn bounds(&self) -> Rect {
        self.node().bounds
    }

    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        let node = self.node();
        node.left.is_none() && node.right.is_none()
    }

    /// Axis the node splits on, `None` for a leaf
    pub fn split_axis(&self) -> Option<Axis> {
        (!self.is_leaf()).then(|| Axis::for_depth(self.depth()))
    }

    /// Indices of the node's own points in ascending rank order
    pub fn point_indices(&self) -> &'t [usize] {
        let node = self.node();
        &self.tree.order[node.start..node.end]
    }

    /// The node's own points in ascending rank order
    pub fn points(&self) -> impl Iterator<Item = &'t Point> + use<'t> {
        let points = self.tree.points;
        self.point_indices().iter().map(move |&i| &points[i])
    }

    /// Child covering the lower half of the split axis
    pub fn left(&self) -> Option<Self> {
        self.node().left.map(|id| Self { tree: self.tree, id })
    }

    /// Child covering the upper half of the split axis
    pub fn right(&self) -> Option<Self> {
        self.node().right.map(|id| Self { tree: self.tree, id })
    }
}

impl fmt::Debug for KdNodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdNodeView")
            .field("id", &self.id)
            .field("depth", &self.depth())
            .field("bounds", &self.bounds())
            .field("points", &self.point_indices().len())
            .field("leaf", &self.is_leaf())
            .finish_non_exhaustive()
    }
}
