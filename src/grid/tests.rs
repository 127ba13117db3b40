use super::*;
use crate::distance::haversine_distance;

fn brute_neighbors(points: &[(f64, f64)], idx: usize, threshold: f64) -> Vec<u32> {
    let (lat, lon) = points[idx];
    (0..points.len())
        .filter(|&j| j != idx)
        .filter(|&j| haversine_distance(lat, lon, points[j].0, points[j].1) <= threshold)
        .map(|j| j as u32)
        .collect()
}

/// Deterministic pseudo-random offsets (no rand dependency in unit tests).
fn scatter(center: (f64, f64), n: usize, spread_deg: f64) -> Vec<(f64, f64)> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    };
    (0..n)
        .map(|_| (center.0 + next() * spread_deg, center.1 + next() * spread_deg))
        .collect()
}

#[test]
fn test_every_point_indexed_once() {
    let points = scatter((39.9, 116.4), 500, 0.05);
    let grid = SpatialGrid::new(&points, 200.0);

    assert_eq!(grid.len(), 500);
    assert!(grid.num_cells() > 1);

    let mut seen = vec![false; points.len()];
    for (idx, &(lat, lon)) in points.iter().enumerate() {
        let key = grid.key_for(lat, lon);
        assert_eq!(key, grid.point_cell(idx));
        let cell = grid.cell_points(key);
        assert!(cell.windows(2).all(|w| w[0] < w[1]), "cell not ascending");
        assert!(cell.contains(&(idx as u32)));
        seen[idx] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_truncation_toward_zero() {
    let points = [(0.0, 0.0)];
    let grid = SpatialGrid::new(&points, 1000.0);
    let step = grid.lat_step;

    assert_eq!(grid.key_for(0.5 * step, 0.0).0, 0);
    assert_eq!(grid.key_for(-0.5 * step, 0.0).0, 0);
    assert_eq!(grid.key_for(1.5 * step, 0.0).0, 1);
    assert_eq!(grid.key_for(-1.5 * step, 0.0).0, -1);
}

#[test]
fn test_neighbors_match_brute_force_city_scale() {
    let points = scatter((39.9, 116.4), 400, 0.02);
    let threshold = 300.0;
    let grid = SpatialGrid::new(&points, threshold);

    for idx in 0..points.len() {
        assert_eq!(
            grid.neighbors_of(idx),
            brute_neighbors(&points, idx, threshold),
            "neighbors differ for point {}",
            idx
        );
    }
}

#[test]
fn test_neighbors_match_brute_force_high_latitude() {
    // Far from the prime meridian at high latitude, per-point longitude scaling
    // would split close pairs across non-adjacent columns.
    let points = scatter((69.6, 170.0), 300, 0.03);
    let threshold = 400.0;
    let grid = SpatialGrid::new(&points, threshold);

    for idx in 0..points.len() {
        assert_eq!(grid.neighbors_of(idx), brute_neighbors(&points, idx, threshold));
    }
}

#[test]
fn test_neighbors_exclude_self_and_far_points() {
    let points = [(39.9, 116.4), (39.9, 116.4), (39.9005, 116.4005), (40.0, 116.4)];
    let grid = SpatialGrid::new(&points, 200.0);

    assert_eq!(grid.neighbors_of(0), vec![1, 2]);
    assert_eq!(grid.neighbors_of(3), Vec::<u32>::new());
    assert_eq!(grid.threshold(), 200.0);
}

#[test]
fn test_neighbors_into_reuses_buffer() {
    let points = [(10.0, 10.0), (10.0001, 10.0), (10.5, 10.5)];
    let grid = SpatialGrid::new(&points, 100.0);
    let mut out = vec![99, 98, 97];

    grid.neighbors_into(0, &mut out);
    assert_eq!(out, vec![1]);
    grid.neighbors_into(2, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_empty_grid() {
    let points: [(f64, f64); 0] = [];
    let grid = SpatialGrid::new(&points, 50.0);
    assert_eq!(grid.len(), 0);
    assert_eq!(grid.num_cells(), 0);
    assert!(grid.cell_points((0, 0)).is_empty());
}

#[test]
fn test_pole_collapses_longitude() {
    let points = [(90.0, 0.0), (89.9999, 120.0), (89.9999, -60.0)];
    let grid = SpatialGrid::new(&points, 50.0);
    for idx in 0..points.len() {
        assert_eq!(grid.neighbors_of(idx), brute_neighbors(&points, idx, 50.0));
    }
}

#[test]
#[should_panic(expected = "finite positive threshold")]
fn test_rejects_non_positive_threshold() {
    let _ = SpatialGrid::new(&[(0.0, 0.0)], 0.0);
}
