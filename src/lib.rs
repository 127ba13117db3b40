//! Co-location search for points of interest.
//!
//! Given points grouped by category (for example store locations per brand) and
//! a distance threshold in meters, find every assignment of one point per
//! category such that all chosen points are pairwise within the threshold.
//! When no assignment covers every category, smaller category subsets are
//! searched, down to pairs.
//!
//! # Example
//!
//! ```
//! use colocate::{find_clusters, Catalog, Point, Strategy};
//!
//! let catalog = Catalog::new()
//!     .with("A", vec![Point::new(39.9000, 116.4000)])?
//!     .with("B", vec![Point::new(39.9005, 116.4005)])?;
//!
//! let clusters = find_clusters(&catalog, 200.0, Strategy::Pruned)?;
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].category_count(), 2);
//! assert!(clusters[0].max_distance() < 200.0);
//! # Ok::<(), colocate::SearchError>(())
//! ```
//!
//! The search is synchronous, single-threaded and CPU-bound. It does not cap
//! its own work: the full cross product over large catalogs can run to billions
//! of combinations. Use [`plan`] to size a search before running it.

mod cluster;
mod error;
mod search;
mod types;

pub mod distance;
pub mod progress;
pub mod report;

pub(crate) mod grid;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use cluster::Cluster;
pub use distance::{haversine_distance, max_pairwise_distance, pairwise_within_threshold};
pub use error::SearchError;
pub use progress::{NoProgress, ProgressEvent, ProgressSink, Stage, TracingProgress};
pub use search::{plan, SearchPlan};
pub use types::{Catalog, LatLon, Point};

/// Default distance threshold in meters.
pub const DEFAULT_THRESHOLD_METERS: f64 = 200.0;

/// How candidate assignments are enumerated.
///
/// Both strategies validate every candidate exactly and return the same clusters
/// in the same order, except for pairs straddling the ±180° meridian, which the
/// pruned strategy does not see as neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Spatial grid index plus per-point candidate lists.
    #[default]
    Pruned,
    /// Full cross product of every category's points.
    BruteForce,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Pruned => "pruned",
            Strategy::BruteForce => "brute-force",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pruned" => Ok(Strategy::Pruned),
            "brute-force" | "bruteforce" | "brute_force" => Ok(Strategy::BruteForce),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

/// What to return when no assignment of two or more categories is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Return no clusters.
    #[default]
    Empty,
    /// Return a single cluster with `is_valid() == false`: the first
    /// full-coverage assignment the search rejected, or the first point of every
    /// category if none was examined. Its `max_distance` is a lower bound.
    BestEffort,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fallback::Empty => "empty",
            Fallback::BestEffort => "best-effort",
        })
    }
}

impl FromStr for Fallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "empty" => Ok(Fallback::Empty),
            "best-effort" | "best_effort" | "besteffort" => Ok(Fallback::BestEffort),
            other => Err(format!("unknown fallback '{}'", other)),
        }
    }
}

/// Configuration for a cluster search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Enumeration strategy.
    pub strategy: Strategy,
    /// Result when nothing of two or more categories validates.
    pub fallback: Fallback,
    /// Emit a progress event every this many combinations (0 disables ticks).
    pub tick_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Pruned,
            fallback: Fallback::Empty,
            tick_interval: 10_000,
        }
    }
}

impl SearchConfig {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: u64) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No category had any points.
    Empty,
    /// One non-empty category: one trivial cluster per point.
    SingleCategory,
    /// At least one assignment covering every category.
    FullCoverage,
    /// Only assignments over category subsets (two or more categories).
    Degraded,
    /// Nothing valid; a single best-effort cluster was returned.
    BestEffort,
    /// Nothing valid; no clusters returned.
    NoMatch,
}

/// Diagnostic information from a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDiagnostics {
    pub outcome: Outcome,
    /// Total combinations validated across all stages.
    pub combinations_examined: u64,
    /// Categories skipped because they had no points, in catalog order.
    pub dropped_categories: Vec<String>,
}

/// Output from a search, including clusters and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutput {
    /// Clusters in result order.
    pub clusters: Vec<Cluster>,
    pub diagnostics: SearchDiagnostics,
}

/// Find clusters with the given strategy and default settings otherwise.
///
/// Returns every valid full-coverage cluster in enumeration order. If there is
/// none, returns every valid cluster over category subsets of two or more,
/// ordered by descending category count (ties in discovery order). If there is
/// still none, returns an empty vector (see [`Fallback`] for the alternative).
/// A catalog with a single non-empty category yields one cluster per point.
///
/// Fails with [`SearchError::InvalidThreshold`] unless `threshold` is finite and
/// positive, and with [`SearchError::MalformedPoint`] if any coordinate is
/// missing, non-finite or out of range.
pub fn find_clusters(
    catalog: &Catalog,
    threshold: f64,
    strategy: Strategy,
) -> Result<Vec<Cluster>, SearchError> {
    let config = SearchConfig::default().with_strategy(strategy);
    Ok(find_clusters_with(catalog, threshold, &config, &mut NoProgress)?.clusters)
}

/// Find clusters with explicit configuration and a progress sink.
pub fn find_clusters_with(
    catalog: &Catalog,
    threshold: f64,
    config: &SearchConfig,
    progress: &mut dyn ProgressSink,
) -> Result<SearchOutput, SearchError> {
    search::run(catalog, threshold, config, progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse_and_display() {
        for strategy in [Strategy::Pruned, Strategy::BruteForce] {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("BruteForce".parse::<Strategy>(), Ok(Strategy::BruteForce));
        assert!("fast".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_fallback_parse_and_display() {
        for fallback in [Fallback::Empty, Fallback::BestEffort] {
            assert_eq!(fallback.to_string().parse::<Fallback>(), Ok(fallback));
        }
        assert!("maybe".parse::<Fallback>().is_err());
    }

    #[test]
    fn test_config_defaults_and_serde() {
        let config = SearchConfig::default();
        assert_eq!(config.strategy, Strategy::Pruned);
        assert_eq!(config.fallback, Fallback::Empty);
        assert_eq!(config.tick_interval, 10_000);

        let parsed: SearchConfig =
            serde_json::from_str(r#"{"strategy": "brute-force", "fallback": "best-effort"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            SearchConfig::default()
                .with_strategy(Strategy::BruteForce)
                .with_fallback(Fallback::BestEffort)
        );
    }
}
