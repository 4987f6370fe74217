//! Tree partition SVG renderer
//! Draws every node of a quadtree and a kd-tree through the read-only node
//! views, highlights a query rectangle and marks the points it returns.

use rand::{Rng, SeedableRng};
use rankrange::prelude::*;
use std::fmt::Write as _;
use std::fs;

const SIZE: f64 = 1024.0;

/// SVG y grows downwards; tree space grows upwards
fn flip(y: f64) -> f64 {
    SIZE - y
}

fn svg_rect(svg: &mut String, r: &Rect, class: &str) {
    let _ = writeln!(
        svg,
        "  <rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" class=\"{}\"/>",
        r.min_x,
        flip(r.max_y),
        r.width(),
        r.height(),
        class
    );
}

fn svg_points<'a>(svg: &mut String, points: impl Iterator<Item = &'a Point>, class: &str) {
    for p in points {
        let _ = writeln!(svg, "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"2\" class=\"{}\"/>", p.x, flip(p.y), class);
    }
}

fn open_svg() -> String {
    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        svg,
        "<svg width=\"{0}\" height=\"{0}\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {0} {0}\">",
        SIZE as i32
    );
    svg.push_str("  <style>\n");
    svg.push_str("    .node { fill: none; stroke: #4B4B91; stroke-width: 0.6; }\n");
    svg.push_str("    .query { fill: #0F0F0F; fill-opacity: 0.15; stroke: #0F0F0F; }\n");
    svg.push_str("    .point { fill: #999999; }\n");
    svg.push_str("    .hit { fill: #22AA22; }\n");
    svg.push_str("  </style>\n");
    svg
}

fn write_svg(name: &str, mut svg: String) {
    svg.push_str("</svg>\n");
    match fs::write(name, svg) {
        Ok(()) => println!("✓ Generated: {name}"),
        Err(e) => eprintln!("Failed to write {name}: {e}"),
    }
}

fn main() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2015);
    let points: Vec<Point> = (0..2_000)
        .map(|i| Point::new(i, i as i32, rng.random_range(0.0..SIZE), rng.random_range(0.0..SIZE)))
        .collect();
    let world = Rect::new(0.0, 0.0, SIZE, SIZE);
    let query = Rect::new(300.0, 200.0, 700.0, 520.0);

    let quad = QuadTree::build(&points, world, QuadTreeConfig::default().with_max_points_per_leaf(16));
    let kd = match KdTree::build(&points, world, KdTreeConfig::default()) {
        Ok(kd) => kd,
        Err(e) => {
            eprintln!("kd-tree build failed: {e}");
            return;
        }
    };

    let mut svg = open_svg();
    for node in quad.nodes() {
        svg_rect(&mut svg, &node.bounds(), "node");
        svg_points(&mut svg, node.points(), "point");
    }
    svg_rect(&mut svg, &query, "query");
    svg_points(&mut svg, quad.query_points(&query).into_iter(), "hit");
    println!("quadtree: {} nodes, height {}", quad.node_count(), quad.height());
    write_svg("quadtree.svg", svg);

    let mut svg = open_svg();
    for node in kd.nodes() {
        svg_rect(&mut svg, &node.bounds(), "node");
        svg_points(&mut svg, node.points(), "point");
    }
    svg_rect(&mut svg, &query, "query");
    svg_points(&mut svg, kd.query_points(&query).into_iter(), "hit");
    println!("kd-tree: {} nodes, height {}", kd.node_count(), kd.height());
    write_svg("kdtree.svg", svg);
}
