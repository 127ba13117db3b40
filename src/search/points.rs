//! Flattened view of a catalog's non-empty categories.

use std::ops::Range;

use crate::{Catalog, Cluster, Point};

/// All points of the non-empty categories, flattened in catalog order.
///
/// Point indices are assigned category by category, so the indices of one
/// category form a contiguous ascending range and sorting indices preserves
/// catalog order within each category.
pub(crate) struct PointArena<'a> {
    names: Vec<&'a str>,
    points: Vec<&'a Point>,
    /// Flattened point indices `0..n`; category lists are slices of this.
    indices: Vec<u32>,
    ranges: Vec<Range<usize>>,
    category_of: Vec<u32>,
    dropped: Vec<String>,
}

impl<'a> PointArena<'a> {
    pub(crate) fn new(catalog: &'a Catalog) -> Self {
        let mut names = Vec::new();
        let mut points = Vec::with_capacity(catalog.total_points());
        let mut ranges = Vec::new();
        let mut category_of = Vec::with_capacity(catalog.total_points());
        let mut dropped = Vec::new();

        for (name, category_points) in catalog.iter() {
            if category_points.is_empty() {
                dropped.push(name.to_string());
                continue;
            }
            let category = names.len() as u32;
            let start = points.len();
            points.extend(category_points.iter());
            category_of.extend(std::iter::repeat(category).take(category_points.len()));
            ranges.push(start..points.len());
            names.push(name);
        }

        let indices = (0..points.len() as u32).collect();

        Self {
            names,
            points,
            indices,
            ranges,
            category_of,
            dropped,
        }
    }

    #[inline]
    pub(crate) fn num_categories(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub(crate) fn name(&self, category: usize) -> &'a str {
        self.names[category]
    }

    #[inline]
    pub(crate) fn point(&self, idx: u32) -> &'a Point {
        self.points[idx as usize]
    }

    #[inline]
    pub(crate) fn points(&self) -> &[&'a Point] {
        &self.points
    }

    /// Flattened indices of a category's points, in catalog order.
    #[inline]
    pub(crate) fn category_indices(&self, category: usize) -> &[u32] {
        &self.indices[self.ranges[category].clone()]
    }

    #[inline]
    pub(crate) fn category_of(&self, idx: u32) -> usize {
        self.category_of[idx as usize] as usize
    }

    /// Names of categories dropped for having no points.
    pub(crate) fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Build a cluster from one point index per category in `subset`.
    pub(crate) fn cluster(
        &self,
        subset: &[usize],
        combo: &[u32],
        max_distance: f64,
        valid: bool,
    ) -> Cluster {
        debug_assert_eq!(subset.len(), combo.len());
        let members = subset
            .iter()
            .zip(combo)
            .map(|(&category, &idx)| (self.name(category).to_string(), self.point(idx).clone()))
            .collect();
        Cluster::from_unique(members, max_distance, valid)
    }
}
