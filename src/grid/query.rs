//! Query helpers for SpatialGrid.

use super::{CellKey, SpatialGrid};
use crate::distance::haversine_distance;

impl SpatialGrid {
    /// Cell key for `points[idx]` used to build this grid.
    #[inline]
    pub(crate) fn point_cell(&self, idx: usize) -> CellKey {
        self.point_cells[idx]
    }

    /// Points in the cell with the given key (empty if the cell holds none).
    pub(crate) fn cell_points(&self, key: CellKey) -> &[u32] {
        match self.cell_ids.get(&key) {
            Some(&id) => {
                let start = self.cell_offsets[id as usize] as usize;
                let end = self.cell_offsets[id as usize + 1] as usize;
                &self.point_indices[start..end]
            }
            None => &[],
        }
    }

    /// Indices of all other points within `threshold` of `points[idx]`, ascending.
    #[cfg(test)]
    pub(crate) fn neighbors_of(&self, idx: usize) -> Vec<u32> {
        let mut out = Vec::new();
        self.neighbors_into(idx, &mut out);
        out
    }

    /// Like `neighbors_of`, reusing `out` (cleared first).
    pub(crate) fn neighbors_into(&self, idx: usize, out: &mut Vec<u32>) {
        out.clear();
        let (lat, lon) = (self.lats[idx], self.lons[idx]);
        let (cell_lat, cell_lon) = self.point_cell(idx);

        for dlat in -1i64..=1 {
            for dlon in -1i64..=1 {
                // Keys saturate for absurdly small thresholds; skip the off-grid ring.
                let (Some(key_lat), Some(key_lon)) =
                    (cell_lat.checked_add(dlat), cell_lon.checked_add(dlon))
                else {
                    continue;
                };
                for &other in self.cell_points((key_lat, key_lon)) {
                    if other as usize == idx {
                        continue;
                    }
                    let o = other as usize;
                    let d = haversine_distance(lat, lon, self.lats[o], self.lons[o]);
                    if d <= self.threshold {
                        out.push(other);
                    }
                }
            }
        }

        out.sort_unstable();
    }
}
