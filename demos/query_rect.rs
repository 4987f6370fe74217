//! Find the lowest-rank points inside a query rectangle.
use rankrange::prelude::*;

fn main() -> Result<(), IndexError> {
    let points = vec![
        Point::new(0, 0, 5.0, 5.0),     // Rank 0, bottom-left corner
        Point::new(1, 1, 500.0, 500.0), // Rank 1, centre
        Point::new(2, 2, 5.0, 600.0),   // Rank 2, left edge
    ];
    let world = Rect::new(0.0, 0.0, 1024.0, 1024.0);

    let quad = QuadTree::build(&points, world, QuadTreeConfig::default());
    let kd = KdTree::build(&points, world, KdTreeConfig::default())?;

    let query = Rect::new(0.0, 0.0, 10.0, 10.0);
    let mut results = Vec::new();

    quad.query_top_k(&query, &mut results);
    println!("QuadTree: {:?}", results);
    assert_eq!(results, vec![0], "Only rank 0 lies in the corner");

    kd.query_top_k(&query, &mut results);
    println!("KdTree:   {:?}", results);
    assert_eq!(results, vec![0], "Only rank 0 lies in the corner");

    for p in kd.query_points(&Rect::new(0.0, 0.0, 600.0, 600.0)) {
        println!("  id={} rank={} at ({}, {})", p.id, p.rank, p.x, p.y);
    }
    Ok(())
}
