//! Per-point, per-category neighbor candidates.

use super::points::PointArena;
use super::product::product_len;
use crate::grid::SpatialGrid;
use crate::progress::{ProgressEvent, ProgressSink, Stage};

/// For every point, the points of each other category within the threshold.
///
/// `lists[point * num_categories + category]` holds ascending point indices.
/// A point's own category list is always empty. Read-only once built.
pub(crate) struct Candidates {
    num_categories: usize,
    lists: Vec<Vec<u32>>,
}

impl Candidates {
    /// Query `grid` for every point, grouping neighbors by category.
    pub(crate) fn build(
        arena: &PointArena<'_>,
        grid: &SpatialGrid,
        progress: &mut dyn ProgressSink,
    ) -> Self {
        let k = arena.num_categories();
        let mut lists = vec![Vec::new(); arena.len() * k];
        let mut neighbors = Vec::new();

        for category in 0..k {
            let name = arena.name(category);
            let members = arena.category_indices(category);
            progress.on_event(
                &ProgressEvent::new(
                    Stage::CandidateBuild,
                    format!("collecting candidates for {} points", members.len()),
                )
                .with_category(name)
                .with_counts(category as u64 + 1, k as u64),
            );

            for &idx in members {
                grid.neighbors_into(idx as usize, &mut neighbors);
                let row = idx as usize * k;
                // Neighbors are ascending, so each per-category list stays in catalog order.
                for &other in &neighbors {
                    let other_category = arena.category_of(other);
                    if other_category != category {
                        lists[row + other_category].push(other);
                    }
                }
            }
        }

        Self {
            num_categories: k,
            lists,
        }
    }

    /// Candidates for `point` in `category`.
    #[inline]
    pub(crate) fn get(&self, point: u32, category: usize) -> &[u32] {
        &self.lists[point as usize * self.num_categories + category]
    }

    /// Number of combinations a pivot-driven scan over `subset` will visit.
    ///
    /// Pivot is `subset[0]`; pivot points missing a candidate in any other
    /// subset category contribute nothing.
    pub(crate) fn combination_count(&self, arena: &PointArena<'_>, subset: &[usize]) -> u128 {
        let Some((&pivot, rest)) = subset.split_first() else {
            return 0;
        };
        arena
            .category_indices(pivot)
            .iter()
            .map(|&p| product_len(rest.iter().map(|&c| self.get(p, c).len())))
            .fold(0u128, |acc, n| acc.saturating_add(n))
    }
}
