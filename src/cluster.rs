//! Cluster records returned by the search.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{Point, SearchError};

/// One point per category for some set of categories.
///
/// Members are kept in category iteration order. A valid cluster has every
/// pairwise distance within the search threshold and `max_distance` is the
/// exact maximum. A best-effort cluster (see [`crate::Fallback::BestEffort`]) is
/// not valid and its `max_distance` is only the first violating distance found,
/// a lower bound on the true maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    members: Vec<(String, Point)>,
    max_distance: f64,
    valid: bool,
}

impl Cluster {
    /// Build a cluster, rejecting repeated category names.
    pub fn new(
        members: Vec<(String, Point)>,
        max_distance: f64,
        valid: bool,
    ) -> Result<Self, SearchError> {
        for (i, (category, _)) in members.iter().enumerate() {
            if members[..i].iter().any(|(other, _)| other == category) {
                return Err(SearchError::duplicate_category(category.clone()));
            }
        }
        Ok(Self::from_unique(members, max_distance, valid))
    }

    /// Build from members whose categories are already known to be distinct.
    pub(crate) fn from_unique(
        members: Vec<(String, Point)>,
        max_distance: f64,
        valid: bool,
    ) -> Self {
        debug_assert!(
            members
                .iter()
                .enumerate()
                .all(|(i, (c, _))| members[..i].iter().all(|(o, _)| o != c)),
            "cluster categories must be unique"
        );
        Self {
            members,
            max_distance,
            valid,
        }
    }

    /// Single-category cluster: one point, no pairwise constraint.
    pub(crate) fn single(category: &str, point: &Point) -> Self {
        Self::from_unique(vec![(category.to_string(), point.clone())], 0.0, true)
    }

    /// Point chosen for `category`, if the cluster covers it.
    pub fn get(&self, category: &str) -> Option<&Point> {
        self.members
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, point)| point)
    }

    /// `(category, point)` pairs in category order.
    #[inline]
    pub fn members(&self) -> &[(String, Point)] {
        &self.members
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|(name, _)| name.as_str())
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.members.iter().map(|(_, point)| point)
    }

    #[inline]
    pub fn category_count(&self) -> usize {
        self.members.len()
    }

    /// Maximum pairwise distance in meters (see type docs for best-effort clusters).
    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// True if every pairwise distance was within the threshold.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

struct MemberMap<'a>(&'a [(String, Point)]);

impl Serialize for MemberMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, point) in self.0 {
            map.serialize_entry(category, point)?;
        }
        map.end()
    }
}

impl Serialize for Cluster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            categories: MemberMap<'a>,
            points: Vec<&'a Point>,
            max_distance: f64,
            category_count: usize,
            valid: bool,
        }

        Repr {
            categories: MemberMap(&self.members),
            points: self.points().collect(),
            max_distance: self.max_distance,
            category_count: self.category_count(),
            valid: self.valid,
        }
        .serialize(serializer)
    }
}
