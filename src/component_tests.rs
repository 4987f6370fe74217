//! Component tests for QuadTree and KdTree - build structure and traversal
//! This file provides granular coverage of each tree's construction rules

#[cfg(test)]
mod tests {
    use crate::{
        Axis, IndexError, KdNodeView, KdTree, KdTreeConfig, Point, QuadTree, QuadTreeConfig, Quadrant, RangeTopK,
        Rect,
    };
    use rand::{Rng, SeedableRng};

    const WORLD: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn random_points(count: usize, seed: u64) -> Vec<Point> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| Point::new(i as u32, i as i32, rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect()
    }

    fn at(points: &[(f64, f64)]) -> Vec<Point> {
        points.iter().enumerate().map(|(i, &(x, y))| Point::new(i as u32, i as i32, x, y)).collect()
    }

    // ============================================================================
    // QUADTREE BUILD TESTS
    // ============================================================================

    #[test]
    fn test_quadtree_empty() {
        let points: Vec<Point> = Vec::new();
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default());
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1, "Empty tree still has a root");
        assert_eq!(tree.height(), 0);
        assert!(tree.root().is_leaf());

        let mut results = vec![7];
        tree.query_top_k(&WORLD, &mut results);
        assert!(results.is_empty());
    }

    #[test]
    fn test_quadtree_default_config() {
        let config = QuadTreeConfig::default();
        assert_eq!(config.max_points_per_leaf, 32);
        assert_eq!(config.max_depth, 64);
        let custom = config.with_max_points_per_leaf(4).with_max_depth(3);
        assert_eq!(custom, QuadTreeConfig { max_points_per_leaf: 4, max_depth: 3 });
    }

    #[test]
    fn test_quadtree_leaf_fills_to_capacity() {
        let points = at(&[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0), (90.0, 90.0)]);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default().with_max_points_per_leaf(4));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.node_count(), 1, "No split until the leaf overflows");
        assert_eq!(tree.root().point_indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_quadtree_split_keeps_existing_points() {
        let points = at(&[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0), (40.0, 40.0), (80.0, 80.0)]);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default().with_max_points_per_leaf(4));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.node_count(), 5);

        let root = tree.root();
        assert!(!root.is_leaf());
        assert_eq!(root.point_indices(), &[0, 1, 2, 3], "Points present before the split stay on the parent");

        let ne = root.child(Quadrant::NorthEast).expect("subdivided root has children");
        assert_eq!(ne.point_indices(), &[4], "Only the triggering point descends");
        assert_eq!(ne.depth(), 1);
        for q in [Quadrant::NorthWest, Quadrant::SouthWest, Quadrant::SouthEast] {
            let child = root.child(q).expect("all four children exist");
            assert!(child.point_indices().is_empty(), "{q:?} should be empty");
        }
    }

    #[test]
    fn test_quadtree_split_line_precedence() {
        // Capacity 1: the first point pins the root, later ones descend
        let points = at(&[(10.0, 10.0), (50.0, 50.0), (50.0, 20.0), (75.0, 50.0)]);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default().with_max_points_per_leaf(1));
        let children = tree.root().children().expect("root was subdivided");

        // (50, 50) lies on both split lines; NW is checked first
        assert_eq!(children[0].point_indices(), &[1]);
        // (50, 20) is on the vertical split below the horizontal one: SW before SE
        assert_eq!(children[2].point_indices(), &[2]);
        // (75, 50) is on the horizontal split right of the vertical one: NE before SE
        assert_eq!(children[1].point_indices(), &[3]);
        assert!(children[3].point_indices().is_empty());
    }

    #[test]
    fn test_quadtree_children_bounds() {
        let points = at(&[(1.0, 1.0), (2.0, 2.0)]);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default().with_max_points_per_leaf(1));
        let children = tree.root().children().expect("root was subdivided");
        let expected = WORLD.quadrants();
        for (child, bounds) in children.iter().zip(expected) {
            assert_eq!(child.bounds(), bounds);
            assert_eq!(child.depth(), 1);
        }
    }

    #[test]
    fn test_quadtree_max_depth_accepts_overflow() {
        let points = at(&[(1.0, 1.0); 5]);
        let config = QuadTreeConfig::default().with_max_points_per_leaf(1).with_max_depth(2);
        let tree = QuadTree::build(&points, WORLD, config);

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node_count(), 9);

        let deepest = tree
            .root()
            .child(Quadrant::SouthWest)
            .and_then(|sw| sw.child(Quadrant::SouthWest))
            .expect("two levels of south-west children");
        assert_eq!(deepest.depth(), 2);
        assert_eq!(deepest.point_indices(), &[2, 3, 4]);
        assert!(deepest.is_leaf());
    }

    #[test]
    fn test_quadtree_drops_out_of_bounds() {
        let points = at(&[(10.0, 10.0), (150.0, 10.0), (20.0, 20.0), (-1.0, 5.0)]);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.dropped(), 2);

        let mut results = Vec::new();
        tree.query_top_k(&Rect::new(-1000.0, -1000.0, 1000.0, 1000.0), &mut results);
        assert_eq!(results, vec![0, 2]);
    }

    #[test]
    fn test_quadtree_try_build_errors() {
        let points = at(&[(10.0, 10.0), (150.0, 10.0)]);
        let err = QuadTree::try_build(&points, WORLD, QuadTreeConfig::default()).unwrap_err();
        assert_eq!(err, IndexError::OutOfBounds { index: 1, x: 150.0, y: 10.0 });

        let inverted = Rect::new(10.0, 0.0, 0.0, 10.0);
        let err = QuadTree::try_build(&points, inverted, QuadTreeConfig::default()).unwrap_err();
        assert_eq!(err, IndexError::InvalidBounds { bounds: inverted });

        let inside = at(&[(10.0, 10.0), (100.0, 100.0)]);
        let tree = QuadTree::try_build(&inside, WORLD, QuadTreeConfig::default()).expect("all points fit");
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.dropped(), 0);
    }

    #[test]
    fn test_quadtree_infinite_bounds() {
        let everywhere = Rect::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY);
        let points = at(&[(1.0, 1.0), (2.0, 2.0), (f64::INFINITY, 3.0)]);
        let config = QuadTreeConfig::default().with_max_points_per_leaf(1);

        let tree = QuadTree::build(&points, everywhere, config);
        assert_eq!(tree.len(), 2, "Both finite points are placed after a split");
        assert_eq!(tree.dropped(), 1, "Only the infinite point is skipped");
        assert_eq!(tree.bounds(), Rect::new(1.0, 1.0, 2.0, 2.0));
        assert!(tree.nodes().all(|n| n.bounds().is_finite()), "Splits never produce NaN edges");

        let mut results = Vec::new();
        tree.query_top_k(&everywhere, &mut results);
        assert_eq!(results, vec![0, 1]);

        assert_eq!(
            QuadTree::try_build(&points[..2], everywhere, config).unwrap_err(),
            IndexError::InvalidBounds { bounds: everywhere }
        );
    }

    #[test]
    fn test_quadtree_half_open_bounds_keep_their_finite_edges() {
        let right_half = Rect::new(0.0, 0.0, f64::INFINITY, f64::INFINITY);
        let points = at(&[(-5.0, 1.0), (1.0, 1.0), (40.0, 7.0), (2.0, 30.0)]);
        let tree = QuadTree::build(&points, right_half, QuadTreeConfig::default().with_max_points_per_leaf(1));
        assert_eq!(tree.bounds(), Rect::new(0.0, 1.0, 40.0, 30.0));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.dropped(), 1, "The point left of the finite edge stays outside");

        let kd = KdTree::build(&points[1..], Rect::new(0.0, 0.0, 64.0, 64.0), KdTreeConfig::default())
            .expect("finite bounds");
        let (mut from_quad, mut from_kd) = (Vec::new(), Vec::new());
        let query = Rect::new(0.0, 0.0, 50.0, 50.0);
        tree.query_top_k(&query, &mut from_quad);
        kd.query_top_k(&query, &mut from_kd);
        let shifted: Vec<usize> = from_kd.iter().map(|&i| i + 1).collect();
        assert_eq!(from_quad, shifted, "Narrowed quadtree agrees with a kd-tree over the same points");
    }

    #[test]
    fn test_quadtree_nodes_cover_every_point() {
        let points = random_points(2_000, 7);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default().with_max_points_per_leaf(8));
        assert_eq!(tree.nodes().count(), tree.node_count());

        let mut seen = vec![false; points.len()];
        for node in tree.nodes() {
            for &i in node.point_indices() {
                assert!(!seen[i], "point {i} attached twice");
                seen[i] = true;
                assert!(node.bounds().contains_point(&points[i]), "point {i} outside its node");
            }
            if let Some(children) = node.children() {
                for child in children {
                    assert_eq!(child.depth(), node.depth() + 1);
                    assert!(node.bounds().contains(&child.bounds()));
                }
            }
        }
        assert!(seen.iter().all(|&s| s), "every point is attached somewhere");
    }

    #[test]
    fn test_quadtree_view_points_match_indices() {
        let points = random_points(100, 3);
        let tree = QuadTree::build(&points, WORLD, QuadTreeConfig::default().with_max_points_per_leaf(4));
        for node in tree.nodes() {
            let ids: Vec<u32> = node.points().map(|p| p.id).collect();
            let expected: Vec<u32> = node.point_indices().iter().map(|&i| points[i].id).collect();
            assert_eq!(ids, expected);
        }
    }

    // ============================================================================
    // KDTREE BUILD TESTS
    // ============================================================================

    fn check_kd_subtree(node: KdNodeView<'_>, points: &[Point], seen: &mut [bool]) {
        let bounds = node.bounds();
        let ranks: Vec<i32> = node.points().map(|p| p.rank).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]), "node points must be rank-sorted: {ranks:?}");
        for &i in node.point_indices() {
            assert!(!seen[i], "point {i} stored twice");
            seen[i] = true;
            assert!(bounds.contains_point(&points[i]), "point {i} outside its node bounds");
        }
        for child in [node.left(), node.right()].into_iter().flatten() {
            assert_eq!(child.depth(), node.depth() + 1);
            assert!(bounds.contains(&child.bounds()), "child bounds escape the parent");
            check_kd_subtree(child, points, seen);
        }
    }

    #[test]
    fn test_kdtree_empty() {
        let points: Vec<Point> = Vec::new();
        let tree = KdTree::build(&points, WORLD, KdTreeConfig::default()).expect("empty build succeeds");
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.nodes().count(), 0);

        let mut results = Vec::new();
        tree.query_top_k(&WORLD, &mut results);
        assert!(results.is_empty());
    }

    #[test]
    fn test_kdtree_default_config() {
        assert_eq!(KdTreeConfig::default().max_depth, 8);
        assert_eq!(KdTreeConfig::default().with_max_depth(3).max_depth, 3);
    }

    #[test]
    fn test_kdtree_single_point() {
        let points = at(&[(42.0, 17.0)]);
        let tree = KdTree::build(&points, WORLD, KdTreeConfig::default()).expect("point is inside");
        let root = tree.root().expect("non-empty tree has a root");
        assert!(root.is_leaf());
        assert_eq!(root.split_axis(), None);
        assert_eq!(root.point_indices(), &[0]);
        assert_eq!(root.bounds(), WORLD);
    }

    #[test]
    fn test_kdtree_median_split_on_x() {
        // Ranks deliberately unrelated to position
        let xs = [6.0, 2.0, 0.0, 5.0, 3.0, 1.0, 4.0];
        let points: Vec<Point> =
            xs.iter().enumerate().map(|(i, &x)| Point::new(i as u32, 10 - i as i32, x, 50.0)).collect();
        let tree = KdTree::build(&points, WORLD, KdTreeConfig::default()).expect("points are inside");

        let root = tree.root().expect("root exists");
        assert_eq!(root.split_axis(), Some(Axis::X));
        let pivot: Vec<f64> = root.points().map(|p| p.x).collect();
        assert_eq!(pivot, vec![3.0], "median x of 0..=6");

        let left = root.left().expect("three points below the median");
        let right = root.right().expect("three points above the median");
        assert_eq!(left.bounds(), Rect::new(0.0, 0.0, 3.0, 100.0));
        assert_eq!(right.bounds(), Rect::new(3.0, 0.0, 100.0, 100.0));
        assert!(left.points().all(|p| p.x <= 3.0));
        assert!(right.points().all(|p| p.x >= 3.0));
        assert_eq!(left.split_axis(), Some(Axis::Y), "depth 1 splits on y");
    }

    #[test]
    fn test_kdtree_two_points_single_child() {
        let points = at(&[(10.0, 10.0), (20.0, 20.0)]);
        let tree = KdTree::build(&points, WORLD, KdTreeConfig::default()).expect("points are inside");
        let root = tree.root().expect("root exists");
        // Median index 1 is the larger x; only the left side is non-empty
        assert_eq!(root.point_indices(), &[1]);
        assert!(root.right().is_none());
        let left = root.left().expect("left child holds the other point");
        assert_eq!(left.point_indices(), &[0]);
        assert!(left.is_leaf());
    }

    #[test]
    fn test_kdtree_max_depth_zero_keeps_all_sorted() {
        let points: Vec<Point> = [(5, 1.0), (3, 2.0), (9, 3.0), (0, 4.0)]
            .iter()
            .enumerate()
            .map(|(i, &(rank, x))| Point::new(i as u32, rank, x, x))
            .collect();
        let tree = KdTree::build(&points, WORLD, KdTreeConfig::default().with_max_depth(0)).expect("inside");
        let root = tree.root().expect("root exists");
        assert!(root.is_leaf());
        let ranks: Vec<i32> = root.points().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![0, 3, 5, 9]);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_kdtree_structure_invariants() {
        let points = random_points(3_000, 11);
        for max_depth in [0, 1, 4, 8, 20] {
            let tree = KdTree::build(&points, WORLD, KdTreeConfig::default().with_max_depth(max_depth))
                .expect("random points are inside");
            assert!(tree.height() <= max_depth);
            let mut seen = vec![false; points.len()];
            check_kd_subtree(tree.root().expect("root exists"), &points, &mut seen);
            assert!(seen.iter().all(|&s| s), "every point is stored exactly once (max_depth {max_depth})");
            assert_eq!(tree.nodes().count(), tree.node_count());
        }
    }

    #[test]
    fn test_kdtree_nodes_pre_order() {
        let points = random_points(64, 5);
        let tree = KdTree::build(&points, WORLD, KdTreeConfig::default()).expect("inside");
        let first = tree.nodes().next().expect("non-empty");
        assert_eq!(first.depth(), 0);
        assert_eq!(first.bounds(), tree.bounds());
    }

    #[test]
    fn test_kdtree_build_errors() {
        let points = at(&[(10.0, 10.0), (f64::NAN, 5.0)]);
        assert_eq!(
            KdTree::build(&points, WORLD, KdTreeConfig::default()).unwrap_err(),
            IndexError::NonFiniteCoordinate { index: 1 }
        );
        assert_eq!(
            KdTree::from_points(&points, KdTreeConfig::default()).unwrap_err(),
            IndexError::NonFiniteCoordinate { index: 1 }
        );

        let outside = at(&[(10.0, 10.0), (10.0, 101.0)]);
        assert_eq!(
            KdTree::build(&outside, WORLD, KdTreeConfig::default()).unwrap_err(),
            IndexError::OutOfBounds { index: 1, x: 10.0, y: 101.0 }
        );

        let nan_bounds = Rect::new(0.0, f64::NAN, 10.0, 10.0);
        assert!(matches!(
            KdTree::build(&outside, nan_bounds, KdTreeConfig::default()),
            Err(IndexError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_kdtree_rejects_infinite_bounds() {
        let points = at(&[(1.0, 1.0), (2.0, 2.0)]);
        let open = Rect::new(0.0, f64::NEG_INFINITY, 10.0, 10.0);
        assert_eq!(
            KdTree::build(&points, open, KdTreeConfig::default()).unwrap_err(),
            IndexError::InvalidBounds { bounds: open }
        );
    }

    #[test]
    fn test_kdtree_from_points_uses_tight_bounds() {
        let points = at(&[(-5.0, 2.0), (7.0, -3.0), (1.0, 9.0)]);
        let tree = KdTree::from_points(&points, KdTreeConfig::default()).expect("finite points");
        assert_eq!(tree.bounds(), Rect::new(-5.0, -3.0, 7.0, 9.0));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_error_messages() {
        let err = IndexError::OutOfBounds { index: 3, x: 1.5, y: -2.0 };
        assert_eq!(err.to_string(), "point 3 at (1.5, -2) lies outside the index bounds");
        let err = IndexError::NonFiniteCoordinate { index: 9 };
        assert_eq!(err.to_string(), "point 9 has a non-finite coordinate");
    }
}
