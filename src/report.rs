//! Plain-text and JSON presentations of a result set.
//!
//! Hosts use these to show results; the search itself never prints.

use std::fmt;

use serde::Serialize;

use crate::Cluster;

/// A result set with an optional locality label.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResultReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<&'a str>,
    pub cluster_count: usize,
    pub clusters: &'a [Cluster],
}

impl<'a> ResultReport<'a> {
    pub fn new(clusters: &'a [Cluster]) -> Self {
        Self {
            locality: None,
            cluster_count: clusters.len(),
            clusters,
        }
    }

    pub fn with_locality(mut self, locality: &'a str) -> Self {
        self.locality = Some(locality);
        self
    }

    /// Pretty-printed JSON document `{locality?, cluster_count, clusters}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        match self.locality {
            Some(locality) => writeln!(f, "Clusters in {}", locality)?,
            None => writeln!(f, "Clusters")?,
        }
        writeln!(f, "{}", rule)?;

        if self.clusters.is_empty() {
            writeln!(f, "No clusters found")?;
            return write!(f, "{}", rule);
        }

        writeln!(f, "Found {} clusters", self.clusters.len())?;
        for (i, cluster) in self.clusters.iter().enumerate() {
            writeln!(f)?;
            let marker = if cluster.is_valid() { "" } else { " (best effort)" };
            writeln!(f, "Cluster #{}{}", i + 1, marker)?;
            writeln!(f, "{}", "-".repeat(40))?;
            writeln!(f, "Categories: {}", cluster.category_count())?;
            writeln!(f, "Max distance: {:.2} m", cluster.max_distance())?;
            for (category, point) in cluster.members() {
                writeln!(f, "  [{}]", category)?;
                writeln!(f, "    name:    {}", point.name)?;
                writeln!(f, "    address: {}", point.address)?;
                writeln!(f, "    coords:  ({:.6}, {:.6})", point.lat, point.lon)?;
            }
        }
        write!(f, "{}", rule)
    }
}

/// Text summary of `clusters`.
pub fn summary(clusters: &[Cluster]) -> String {
    ResultReport::new(clusters).to_string()
}

/// JSON document for `clusters`, labelled with `locality` when given.
pub fn to_json(clusters: &[Cluster], locality: Option<&str>) -> serde_json::Result<String> {
    let report = ResultReport::new(clusters);
    match locality {
        Some(locality) => report.with_locality(locality).to_json(),
        None => report.to_json(),
    }
}
