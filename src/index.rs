//! The query surface shared by every search strategy.

use crate::geometry::{Point, Rect};
use crate::topk::TopK;

/// Top-K lowest-rank rectangle search over an indexed point slice.
///
/// Implementors only provide [`search`](Self::search); the helpers route it
/// through a fresh [`TopK`] so every strategy yields directly comparable
/// results for the same query.
pub trait RangeTopK {
    /// The slice the index was built from
    fn points(&self) -> &[Point];

    /// Offers every indexed point inside `query` to `top`.
    ///
    /// Strategies may skip points they can prove `top` would reject. An
    /// invalid `query` offers nothing.
    fn search(&self, query: &Rect, top: &mut TopK);

    /// Clears `results` and fills it with the indices of the (at most
    /// [`DEFAULT_K`](crate::DEFAULT_K)) lowest-rank points inside `query`, in
    /// ascending rank order.
    fn query_top_k(&self, query: &Rect, results: &mut Vec<usize>) {
        results.clear();
        let mut top = TopK::new();
        self.search(query, &mut top);
        results.extend(top.into_sorted());
    }

    /// Like [`query_top_k`](Self::query_top_k) but returns the points themselves
    fn query_points(&self, query: &Rect) -> Vec<&Point> {
        let mut top = TopK::new();
        self.search(query, &mut top);
        let points = self.points();
        top.into_sorted().into_iter().map(|i| &points[i]).collect()
    }
}
