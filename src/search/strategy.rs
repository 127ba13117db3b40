//! Combination sources: where candidate assignments come from.
//!
//! Both sources yield one point index per subset category, in subset order,
//! and both yield in the same relative order (pivot point, then the remaining
//! categories' lists in catalog order), so their valid results agree.

use super::candidates::Candidates;
use super::points::PointArena;
use super::product::{product_len, CrossProduct};
use crate::grid::SpatialGrid;
use crate::progress::{ProgressEvent, ProgressSink, Stage};

/// A way of enumerating candidate assignments for a subset of categories.
pub(crate) trait CombinationSource {
    /// Number of combinations `for_each` will visit for `subset`.
    fn combination_count(&self, subset: &[usize]) -> u128;

    /// Visit every candidate combination for `subset` (category indices, ascending).
    fn for_each(&self, subset: &[usize], visit: &mut dyn FnMut(&[u32]));
}

/// Full cross product of every category's points.
pub(crate) struct BruteForce<'a> {
    arena: &'a PointArena<'a>,
}

impl<'a> BruteForce<'a> {
    pub(crate) fn new(arena: &'a PointArena<'a>) -> Self {
        Self { arena }
    }
}

impl CombinationSource for BruteForce<'_> {
    fn combination_count(&self, subset: &[usize]) -> u128 {
        if subset.is_empty() {
            return 0;
        }
        product_len(
            subset
                .iter()
                .map(|&c| self.arena.category_indices(c).len()),
        )
    }

    fn for_each(&self, subset: &[usize], visit: &mut dyn FnMut(&[u32])) {
        let lists = subset
            .iter()
            .map(|&c| self.arena.category_indices(c))
            .collect();
        let mut product = CrossProduct::new(lists);
        while let Some(combo) = product.next_combination() {
            visit(combo);
        }
    }
}

/// Pivot-driven product restricted to spatial candidates.
///
/// For each point of the pivot category (`subset[0]`), only points within the
/// threshold of that pivot point are considered for the other categories.
pub(crate) struct Pruned<'a> {
    arena: &'a PointArena<'a>,
    candidates: Candidates,
}

impl<'a> Pruned<'a> {
    /// Build the spatial grid and candidate lists over every arena point.
    pub(crate) fn build(
        arena: &'a PointArena<'a>,
        threshold: f64,
        progress: &mut dyn ProgressSink,
    ) -> Self {
        progress.on_event(&ProgressEvent::new(
            Stage::IndexBuild,
            format!("building spatial index over {} points", arena.len()),
        ));
        let grid = SpatialGrid::new(arena.points(), threshold);
        tracing::debug!(
            points = grid.len(),
            cells = grid.num_cells(),
            threshold = grid.threshold(),
            "spatial index ready"
        );

        let candidates = Candidates::build(arena, &grid, progress);
        Self { arena, candidates }
    }
}

impl CombinationSource for Pruned<'_> {
    fn combination_count(&self, subset: &[usize]) -> u128 {
        self.candidates.combination_count(self.arena, subset)
    }

    fn for_each(&self, subset: &[usize], visit: &mut dyn FnMut(&[u32])) {
        let Some((&pivot, rest)) = subset.split_first() else {
            return;
        };
        let mut combo = Vec::with_capacity(subset.len());

        for &pivot_point in self.arena.category_indices(pivot) {
            let lists: Vec<&[u32]> = rest
                .iter()
                .map(|&c| self.candidates.get(pivot_point, c))
                .collect();
            if lists.iter().any(|l| l.is_empty()) {
                continue;
            }

            let mut product = CrossProduct::new(lists);
            while let Some(rest_combo) = product.next_combination() {
                combo.clear();
                combo.push(pivot_point);
                combo.extend_from_slice(rest_combo);
                visit(&combo);
            }
        }
    }
}
