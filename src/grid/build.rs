//! Grid build for SpatialGrid.

use rustc_hash::FxHashMap;

use super::{cell_key, cell_steps, CellKey, SpatialGrid};
use crate::LatLon;

impl SpatialGrid {
    /// Bucket `points` into cells sized for `threshold` meters.
    ///
    /// Point indices in queries refer to positions in `points`. Coordinates must
    /// already be validated (finite, in range).
    pub(crate) fn new<P: LatLon>(points: &[P], threshold: f64) -> Self {
        assert!(
            threshold.is_finite() && threshold > 0.0,
            "SpatialGrid requires a finite positive threshold"
        );
        let n = points.len();

        let lats: Vec<f64> = points.iter().map(|p| p.lat()).collect();
        let lons: Vec<f64> = points.iter().map(|p| p.lon()).collect();

        let reference_lat = lats.iter().fold(0.0f64, |acc, lat| acc.max(lat.abs()));
        let (lat_step, lon_step) = cell_steps(threshold, reference_lat);

        // Step 1: classify points and assign cell ids in order of first appearance.
        let point_cells: Vec<CellKey> = lats
            .iter()
            .zip(&lons)
            .map(|(&lat, &lon)| cell_key(lat, lon, lat_step, lon_step))
            .collect();

        let mut cell_ids: FxHashMap<CellKey, u32> = FxHashMap::default();
        let mut point_cell_ids = Vec::with_capacity(n);
        for key in &point_cells {
            let next_id = cell_ids.len() as u32;
            let id = *cell_ids.entry(*key).or_insert(next_id);
            point_cell_ids.push(id);
        }
        let num_cells = cell_ids.len();

        // Step 2: count points per cell, prefix sum to get offsets.
        let mut cell_counts = vec![0u32; num_cells];
        for &id in &point_cell_ids {
            cell_counts[id as usize] += 1;
        }

        let mut cell_offsets = Vec::with_capacity(num_cells + 1);
        cell_offsets.push(0);
        let mut sum = 0u32;
        for &count in &cell_counts {
            sum += count;
            cell_offsets.push(sum);
        }
        debug_assert_eq!(sum as usize, n, "prefix sum mismatch");

        // Step 3: scatter point indices into their cells. Visiting points in index
        // order keeps each cell's slice ascending.
        let mut cursor: Vec<u32> = cell_offsets[..num_cells].to_vec();
        let mut point_indices = vec![0u32; n];
        for (idx, &id) in point_cell_ids.iter().enumerate() {
            let slot = &mut cursor[id as usize];
            point_indices[*slot as usize] = idx as u32;
            *slot += 1;
        }

        tracing::trace!(points = n, cells = num_cells, lat_step, lon_step, "spatial grid built");

        Self {
            threshold,
            lat_step,
            lon_step,
            lats,
            lons,
            cell_ids,
            cell_offsets,
            point_indices,
            point_cells,
        }
    }
}
