//! Brute force vs quadtree vs kd-tree, query by query
//!
//! Generates 50k ranked points in a 1024x1024 space, builds both trees and
//! runs random queries through all three strategies, printing per-query
//! timings and result counts followed by the averages.
//!
//! ```bash
//! RUST_LOG=rankrange=debug cargo run --release --example perf
//! ```

use rand::{Rng, SeedableRng};
use rankrange::prelude::*;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const NUM_POINTS: usize = 50_000;
const NUM_QUERIES: usize = 100;
const MAX_RANGE: u32 = 1024;

struct QueryReport {
    brute_force: Duration,
    quadtree: Duration,
    kdtree: Duration,
    count_bf: usize,
    count_qt: usize,
    count_kd: usize,
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn timed<I: RangeTopK>(index: &I, query: &Rect, results: &mut Vec<usize>) -> Duration {
    let start = Instant::now();
    index.query_top_k(query, results);
    start.elapsed()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = rand::rngs::StdRng::seed_from_u64(1_000_000_000_000);

    // Rank follows generation order; coordinates avoid the zero edge
    let points: Vec<Point> = (0..NUM_POINTS)
        .map(|i| {
            Point::new(
                rng.random_range(0..10_000),
                i as i32,
                rng.random_range(f64::EPSILON..f64::from(MAX_RANGE)),
                rng.random_range(f64::EPSILON..f64::from(MAX_RANGE)),
            )
        })
        .collect();

    // Query rectangles span [r/2, r] on each axis
    let queries: Vec<Rect> = (0..NUM_QUERIES)
        .map(|_| {
            let r = f64::from(rng.random_range(0..MAX_RANGE));
            let r2 = f64::from(rng.random_range(0..MAX_RANGE));
            Rect::new((r / 2.0).floor(), (r2 / 2.0).floor(), r, r2)
        })
        .collect();

    let world = Rect::new(0.0, 0.0, f64::from(MAX_RANGE), f64::from(MAX_RANGE));

    let start = Instant::now();
    let quad = QuadTree::build(&points, world, QuadTreeConfig::default());
    info!("quadtree creation time: {:.3} ms", ms(start.elapsed()));

    let start = Instant::now();
    let kd = match KdTree::build(&points, world, KdTreeConfig::default()) {
        Ok(kd) => kd,
        Err(e) => {
            error!("kd-tree build failed: {e}");
            return;
        }
    };
    info!("kdtree creation time: {:.3} ms", ms(start.elapsed()));

    let scan = LinearScan::new(&points);
    let mut reports = Vec::with_capacity(queries.len());
    let (mut bf, mut qt, mut kt) = (Vec::new(), Vec::new(), Vec::new());

    for query in &queries {
        let report = QueryReport {
            brute_force: timed(&scan, query, &mut bf),
            quadtree: timed(&quad, query, &mut qt),
            kdtree: timed(&kd, query, &mut kt),
            count_bf: bf.len(),
            count_qt: qt.len(),
            count_kd: kt.len(),
        };
        assert_eq!(qt, bf, "quadtree disagrees with brute force on {query:?}");
        assert_eq!(kt, bf, "kd-tree disagrees with brute force on {query:?}");
        reports.push(report);
    }

    for (i, r) in reports.iter().enumerate() {
        println!("=============================================");
        println!("QUERY {}", i + 1);
        println!("brute force time: {:.4} ms  results: {}", ms(r.brute_force), r.count_bf);
        println!("quadtree time:    {:.4} ms  results: {}", ms(r.quadtree), r.count_qt);
        println!("kdtree time:      {:.4} ms  results: {}", ms(r.kdtree), r.count_kd);
    }

    let n = reports.len().max(1) as f64;
    let avg = |f: fn(&QueryReport) -> Duration| reports.iter().map(|r| ms(f(r))).sum::<f64>() / n;
    println!();
    println!("AVG bf : {:.4} ms", avg(|r: &QueryReport| r.brute_force));
    println!("AVG qt : {:.4} ms", avg(|r: &QueryReport| r.quadtree));
    println!("AVG kd : {:.4} ms", avg(|r: &QueryReport| r.kdtree));
}
