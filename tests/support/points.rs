#![allow(dead_code)]

use colocate::{Catalog, Point};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const METERS_PER_DEGREE: f64 = 111_194.93;

/// Offset `(lat, lon)` by `north` and `east` meters (small-distance approximation).
pub fn offset(lat: f64, lon: f64, north: f64, east: f64) -> (f64, f64) {
    let dlat = north / METERS_PER_DEGREE;
    let dlon = east / (METERS_PER_DEGREE * lat.to_radians().cos());
    (lat + dlat, lon + dlon)
}

/// Random points uniformly spread in a square of half-width `spread` meters.
pub fn random_points_near(lat: f64, lon: f64, spread: f64, n: usize, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_points_near_with_rng(lat, lon, spread, n, &mut rng)
}

pub fn random_points_near_with_rng<R: Rng + ?Sized>(
    lat: f64,
    lon: f64,
    spread: f64,
    n: usize,
    rng: &mut R,
) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let north = rng.gen_range(-spread..spread);
            let east = rng.gen_range(-spread..spread);
            let (plat, plon) = offset(lat, lon, north, east);
            Point::new(plat, plon)
                .with_id(format!("p{}", i))
                .with_name(format!("Point {}", i))
        })
        .collect()
}

/// Random catalog with `sizes[c]` points in category `c`, all near one centre.
pub fn random_catalog(lat: f64, lon: f64, spread: f64, sizes: &[usize], seed: u64) -> Catalog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut catalog = Catalog::new();
    for (c, &n) in sizes.iter().enumerate() {
        let points = random_points_near_with_rng(lat, lon, spread, n, &mut rng);
        catalog
            .insert(format!("cat{}", c), points)
            .expect("generated names are unique");
    }
    catalog
}

/// Catalog from `(category, [(lat, lon), ...])` literals.
pub fn catalog_of(entries: &[(&str, &[(f64, f64)])]) -> Catalog {
    let mut catalog = Catalog::new();
    for (name, coords) in entries {
        let points = coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| {
                Point::new(lat, lon)
                    .with_name(format!("{} {}", name, i))
                    .with_category(*name)
            })
            .collect();
        catalog.insert(*name, points).expect("literal names are unique");
    }
    catalog
}
