//! Flat lat/lon bucket grid for pruning neighbor searches.
//!
//! Cells are `2 * threshold` meters on a side, converted to degrees with a
//! flat-Earth approximation (111 km per degree of latitude, scaled by
//! cos(latitude) for longitude). A neighbor query scans the 3×3 block of cells
//! around a point and keeps only points within `threshold` by exact haversine
//! distance.
//!
//! The longitude scale is taken once, at the largest |latitude| in the indexed
//! set, so cells are at least `2 * threshold` wide at every indexed latitude and
//! any two points within `threshold` land in the same or adjacent cells. Pairs
//! straddling the ±180° meridian are not wrapped and will be missed.
//!
//! Built once per search, read-only afterwards.

mod build;
mod query;

use rustc_hash::FxHashMap;

/// Approximate meters per degree of latitude used for cell sizing.
pub(crate) const METERS_PER_DEGREE: f64 = 111_000.0;

/// Integer cell coordinates `(lat_cell, lon_cell)`.
pub(crate) type CellKey = (i64, i64);

/// Bucket grid over a fixed point set and distance threshold.
pub(crate) struct SpatialGrid {
    threshold: f64,
    /// Cell height in degrees of latitude.
    lat_step: f64,
    /// Cell width in degrees of longitude.
    lon_step: f64,
    /// Point coordinates, indexed by point index.
    lats: Vec<f64>,
    lons: Vec<f64>,
    /// Cell id for each cell key present in the set.
    cell_ids: FxHashMap<CellKey, u32>,
    /// Start index into point_indices for each cell id, plus final length.
    cell_offsets: Vec<u32>,
    /// Point indices grouped by cell, ascending within each cell.
    point_indices: Vec<u32>,
    /// Precomputed cell key per point.
    point_cells: Vec<CellKey>,
}

impl SpatialGrid {
    /// Cell containing the given coordinates under this grid's scale.
    ///
    /// Truncates toward zero, so the cells either side of the equator and
    /// the prime meridian are twice as wide as the rest.
    #[cfg(test)]
    pub(crate) fn key_for(&self, lat: f64, lon: f64) -> CellKey {
        cell_key(lat, lon, self.lat_step, self.lon_step)
    }

    #[inline]
    pub(crate) fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of indexed points.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.lats.len()
    }

    /// Number of non-empty cells.
    #[inline]
    pub(crate) fn num_cells(&self) -> usize {
        self.cell_offsets.len().saturating_sub(1)
    }
}

#[inline]
fn cell_key(lat: f64, lon: f64, lat_step: f64, lon_step: f64) -> CellKey {
    ((lat / lat_step) as i64, (lon / lon_step) as i64)
}

/// Cell steps in degrees for a threshold and reference latitude.
fn cell_steps(threshold: f64, reference_lat: f64) -> (f64, f64) {
    let size = 2.0 * threshold;
    let cos_ref = reference_lat.to_radians().cos().max(1e-12);
    (
        size / METERS_PER_DEGREE,
        size / (METERS_PER_DEGREE * cos_ref),
    )
}

#[cfg(test)]
mod tests;
