//! Core input types: points of interest and the category catalog.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SearchError;

/// A geotagged point of interest.
///
/// Points are produced by an upstream provider and never mutated by the search.
/// Coordinates are WGS84 degrees. A coordinate that was missing or not numeric in
/// the source document is stored as NaN and rejected when a search starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "missing_coordinate", deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "coordinate")]
    pub lon: f64,
    #[serde(default)]
    pub category: String,
}

impl Point {
    /// Create an anonymous point at the given coordinates.
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            address: String::new(),
            lat,
            lon,
            category: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Check that both coordinates are finite and in range.
    ///
    /// Returns a human-readable reason on failure.
    pub fn check_coordinates(&self) -> Result<(), String> {
        check_axis("latitude", self.lat, 90.0)?;
        check_axis("longitude", self.lon, 180.0)
    }
}

fn check_axis(axis: &str, value: f64, limit: f64) -> Result<(), String> {
    if value.is_nan() {
        return Err(format!("{} is missing or not a number", axis));
    }
    if !value.is_finite() || value.abs() > limit {
        return Err(format!(
            "{} {} is outside [-{}, {}]",
            axis, value, limit, limit
        ));
    }
    Ok(())
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

/// Accepts a JSON number or a numeric string; anything else becomes NaN.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(v) => v,
        Raw::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        Raw::Other(_) => f64::NAN,
    })
}

/// Trait for types that can be used as coordinates.
///
/// Lets the distance helpers take points, references, tuples or arrays.
pub trait LatLon {
    fn lat(&self) -> f64;
    fn lon(&self) -> f64;
}

impl LatLon for Point {
    #[inline]
    fn lat(&self) -> f64 {
        self.lat
    }
    #[inline]
    fn lon(&self) -> f64 {
        self.lon
    }
}

impl LatLon for (f64, f64) {
    #[inline]
    fn lat(&self) -> f64 {
        self.0
    }
    #[inline]
    fn lon(&self) -> f64 {
        self.1
    }
}

impl LatLon for [f64; 2] {
    #[inline]
    fn lat(&self) -> f64 {
        self[0]
    }
    #[inline]
    fn lon(&self) -> f64 {
        self[1]
    }
}

impl<T: LatLon + ?Sized> LatLon for &T {
    #[inline]
    fn lat(&self) -> f64 {
        (**self).lat()
    }
    #[inline]
    fn lon(&self) -> f64 {
        (**self).lon()
    }
}

/// Ordered mapping from category name to its points.
///
/// Insertion order is preserved and drives enumeration order, so two searches over
/// the same catalog produce the same sequence of clusters. Category names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Vec<Point>)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category. Fails if the name is already present.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        points: Vec<Point>,
    ) -> Result<(), SearchError> {
        let category = category.into();
        if self.get(&category).is_some() {
            return Err(SearchError::duplicate_category(category));
        }
        self.entries.push((category, points));
        Ok(())
    }

    /// Builder-style `insert`.
    pub fn with(
        mut self,
        category: impl Into<String>,
        points: Vec<Point>,
    ) -> Result<Self, SearchError> {
        self.insert(category, points)?;
        Ok(self)
    }

    /// Parse a JSON object of the form `{"category": [point, ...], ...}`.
    ///
    /// Key order in the document becomes catalog order.
    pub fn from_json_str(json: &str) -> Result<Self, SearchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of categories, including empty ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&[Point]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, points)| points.as_slice())
    }

    /// Iterate categories in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Point])> + '_ {
        self.entries
            .iter()
            .map(|(name, points)| (name.as_str(), points.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of points across all categories.
    pub fn total_points(&self) -> usize {
        self.entries.iter().map(|(_, points)| points.len()).sum()
    }

    /// Validate every coordinate, reporting the first bad point in catalog order.
    pub fn check_points(&self) -> Result<(), SearchError> {
        for (category, points) in self.iter() {
            for (index, point) in points.iter().enumerate() {
                point
                    .check_coordinates()
                    .map_err(|reason| SearchError::malformed_point(category, index, reason))?;
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<(String, Vec<Point>)>> for Catalog {
    type Error = SearchError;

    fn try_from(entries: Vec<(String, Vec<Point>)>) -> Result<Self, Self::Error> {
        let mut catalog = Catalog::new();
        for (category, points) in entries {
            catalog.insert(category, points)?;
        }
        Ok(catalog)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, points) in &self.entries {
            map.serialize_entry(category, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from category name to a list of points")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some((category, points)) = access.next_entry::<String, Vec<Point>>()? {
                    catalog.insert(category, points).map_err(de::Error::custom)?;
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}
