//! Up-front combination counts, for sizing a search before running it.

use serde::Serialize;

use super::candidates::Candidates;
use super::check_threshold;
use super::points::PointArena;
use super::product::product_len;
use crate::grid::SpatialGrid;
use crate::progress::NoProgress;
use crate::{Catalog, SearchError, Strategy};

/// Size of the full-coverage search for a catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPlan {
    /// `(category, point count)` for every non-empty category, in catalog order.
    pub categories: Vec<(String, usize)>,
    /// Size of the unpruned cross product over all non-empty categories
    /// (the point count when only one category remains, 0 when none do).
    pub full_combinations: u128,
    /// Combinations the pruned full-coverage stage would examine.
    /// `None` for brute force or fewer than two categories.
    pub pruned_combinations: Option<u128>,
}

impl SearchPlan {
    /// Combinations the chosen strategy examines in the full-coverage stage.
    pub fn combinations(&self) -> u128 {
        self.pruned_combinations.unwrap_or(self.full_combinations)
    }

    /// Fraction of the full cross product removed by pruning, in `[0, 1]`.
    pub fn reduction(&self) -> Option<f64> {
        let pruned = self.pruned_combinations?;
        if self.full_combinations == 0 {
            return None;
        }
        Some(1.0 - pruned as f64 / self.full_combinations as f64)
    }
}

/// Count the full-coverage combinations a search would examine.
///
/// Validates `threshold` and every point like [`crate::find_clusters`]. With
/// [`Strategy::Pruned`] this builds the spatial index and candidate lists,
/// which costs about as much as the search's own setup.
pub fn plan(
    catalog: &Catalog,
    threshold: f64,
    strategy: Strategy,
) -> Result<SearchPlan, SearchError> {
    check_threshold(threshold)?;
    catalog.check_points()?;

    let arena = PointArena::new(catalog);
    let k = arena.num_categories();
    let categories: Vec<(String, usize)> = (0..k)
        .map(|c| (arena.name(c).to_string(), arena.category_indices(c).len()))
        .collect();

    let full_combinations = if k == 0 {
        0
    } else {
        product_len(categories.iter().map(|(_, n)| *n))
    };

    let pruned_combinations = match strategy {
        Strategy::Pruned if k >= 2 => {
            let grid = SpatialGrid::new(arena.points(), threshold);
            let candidates = Candidates::build(&arena, &grid, &mut NoProgress);
            let all: Vec<usize> = (0..k).collect();
            Some(candidates.combination_count(&arena, &all))
        }
        _ => None,
    };

    Ok(SearchPlan {
        categories,
        full_combinations,
        pruned_combinations,
    })
}
