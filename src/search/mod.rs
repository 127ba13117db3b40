//! Cluster search engine.
//!
//! State machine per call:
//!
//! ```text
//! validate -> drop empty categories -> 0 categories: empty
//!                                   -> 1 category:  one trivial cluster per point
//!                                   -> Stage A (full coverage) -> results
//!                                   -> Stage B (subsets r = k-1 ..= 2) -> results
//!                                   -> terminal fallback (empty | best effort)
//! ```
//!
//! Enumeration is streamed through [`CombinationSource`]; only valid clusters are
//! stored. Nothing is shared between calls.

mod candidates;
mod estimate;
mod points;
mod product;
mod strategy;

pub use estimate::{plan, SearchPlan};

use crate::distance::pairwise_within_threshold;
use crate::progress::{ProgressEvent, ProgressSink, Stage};
use crate::{
    Catalog, Cluster, Fallback, Outcome, Point, SearchConfig, SearchDiagnostics, SearchError,
    SearchOutput, Strategy,
};
use points::PointArena;
use product::Subsets;
use strategy::{BruteForce, CombinationSource, Pruned};

/// Reject non-finite or non-positive thresholds.
pub(crate) fn check_threshold(threshold: f64) -> Result<(), SearchError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(SearchError::InvalidThreshold(threshold))
    }
}

/// First rejected assignment seen during Stage A.
struct FirstInvalid {
    combo: Vec<u32>,
    observed: f64,
}

/// Per-call scan state shared by every stage.
struct Scanner<'s, 'a> {
    arena: &'s PointArena<'a>,
    source: &'s dyn CombinationSource,
    threshold: f64,
    tick_interval: u64,
    progress: &'s mut dyn ProgressSink,
    examined: u64,
}

impl Scanner<'_, '_> {
    /// Validate every combination the source yields for `subset`.
    ///
    /// Returns the valid clusters in enumeration order. When `first_invalid` is
    /// given and still empty, the first rejected combination is recorded there.
    fn scan(
        &mut self,
        stage: Stage,
        subset: &[usize],
        mut first_invalid: Option<&mut Option<FirstInvalid>>,
    ) -> Vec<Cluster> {
        let total = saturate(self.source.combination_count(subset));
        let label = subset
            .iter()
            .map(|&c| self.arena.name(c))
            .collect::<Vec<_>>()
            .join(", ");
        self.progress.on_event(
            &ProgressEvent::new(
                stage,
                format!("checking {} combinations across [{}]", total, label),
            )
            .with_counts(0, total),
        );

        let arena = self.arena;
        let threshold = self.threshold;
        let tick_interval = self.tick_interval;
        let progress = &mut *self.progress;
        let mut examined = 0u64;
        let mut found = Vec::new();
        let mut members: Vec<&Point> = Vec::with_capacity(subset.len());

        self.source.for_each(subset, &mut |combo: &[u32]| {
            members.clear();
            members.extend(combo.iter().map(|&idx| arena.point(idx)));
            let (within, observed) = pairwise_within_threshold(&members, threshold);

            if within {
                found.push(arena.cluster(subset, combo, observed, true));
            } else if let Some(slot) = first_invalid.as_deref_mut() {
                if slot.is_none() {
                    *slot = Some(FirstInvalid {
                        combo: combo.to_vec(),
                        observed,
                    });
                }
            }

            examined += 1;
            if tick_interval > 0 && examined % tick_interval == 0 {
                progress.on_event(
                    &ProgressEvent::new(stage, format!("{} valid so far", found.len()))
                        .with_counts(examined, total),
                );
            }
        });

        self.examined = self.examined.saturating_add(examined);
        tracing::debug!(
            %stage,
            categories = subset.len(),
            examined,
            valid = found.len(),
            "subset scanned"
        );
        found
    }
}

fn saturate(n: u128) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Run a full search. See [`crate::find_clusters_with`].
pub(crate) fn run(
    catalog: &Catalog,
    threshold: f64,
    config: &SearchConfig,
    progress: &mut dyn ProgressSink,
) -> Result<SearchOutput, SearchError> {
    check_threshold(threshold)?;
    catalog.check_points()?;

    let arena = PointArena::new(catalog);
    let k = arena.num_categories();
    let mut diagnostics = SearchDiagnostics {
        outcome: Outcome::Empty,
        combinations_examined: 0,
        dropped_categories: arena.dropped().to_vec(),
    };
    tracing::debug!(
        categories = k,
        points = arena.len(),
        dropped = diagnostics.dropped_categories.len(),
        threshold,
        strategy = %config.strategy,
        "cluster search started"
    );

    let clusters = match k {
        0 => Vec::new(),
        1 => {
            diagnostics.outcome = Outcome::SingleCategory;
            let name = arena.name(0);
            arena
                .category_indices(0)
                .iter()
                .map(|&idx| Cluster::single(name, arena.point(idx)))
                .collect()
        }
        _ => {
            let source: Box<dyn CombinationSource + '_> = match config.strategy {
                Strategy::BruteForce => Box::new(BruteForce::new(&arena)),
                Strategy::Pruned => Box::new(Pruned::build(&arena, threshold, &mut *progress)),
            };
            let mut scanner = Scanner {
                arena: &arena,
                source: source.as_ref(),
                threshold,
                tick_interval: config.tick_interval,
                progress: &mut *progress,
                examined: 0,
            };
            let clusters = search_categories(&mut scanner, config.fallback, &mut diagnostics);
            diagnostics.combinations_examined = scanner.examined;
            clusters
        }
    };

    progress.on_event(
        &ProgressEvent::new(Stage::Done, format!("found {} clusters", clusters.len()))
            .with_counts(diagnostics.combinations_examined, diagnostics.combinations_examined),
    );
    tracing::debug!(
        outcome = ?diagnostics.outcome,
        clusters = clusters.len(),
        examined = diagnostics.combinations_examined,
        "cluster search finished"
    );

    Ok(SearchOutput {
        clusters,
        diagnostics,
    })
}

/// Stage A, then Stage B, then the terminal fallback, over two or more categories.
fn search_categories(
    scanner: &mut Scanner<'_, '_>,
    fallback: Fallback,
    diagnostics: &mut SearchDiagnostics,
) -> Vec<Cluster> {
    let k = scanner.arena.num_categories();
    let all: Vec<usize> = (0..k).collect();

    // Stage A: every category.
    let mut first_invalid = None;
    let full = scanner.scan(Stage::FullCoverage, &all, Some(&mut first_invalid));
    if !full.is_empty() {
        diagnostics.outcome = Outcome::FullCoverage;
        return full;
    }

    // Stage B: sweep every smaller subset size down to pairs, keeping everything.
    let mut partial = Vec::new();
    for r in (2..k).rev() {
        for subset in Subsets::new(k, r) {
            partial.extend(scanner.scan(Stage::Degradation, &subset, None));
        }
    }
    if !partial.is_empty() {
        // Stable: ties keep discovery order.
        partial.sort_by(|a: &Cluster, b: &Cluster| b.category_count().cmp(&a.category_count()));
        diagnostics.outcome = Outcome::Degraded;
        return partial;
    }

    match fallback {
        Fallback::Empty => {
            diagnostics.outcome = Outcome::NoMatch;
            Vec::new()
        }
        Fallback::BestEffort => {
            diagnostics.outcome = Outcome::BestEffort;
            vec![best_effort(scanner, &all, first_invalid)]
        }
    }
}

/// The first rejected full-coverage assignment Stage A saw, or, if it saw none,
/// the first point of every category.
fn best_effort(
    scanner: &Scanner<'_, '_>,
    all: &[usize],
    first_invalid: Option<FirstInvalid>,
) -> Cluster {
    let arena = scanner.arena;
    let FirstInvalid { combo, observed } = match first_invalid {
        Some(first) => first,
        None => {
            let combo: Vec<u32> = all
                .iter()
                .map(|&c| arena.category_indices(c)[0])
                .collect();
            let members: Vec<&Point> = combo.iter().map(|&idx| arena.point(idx)).collect();
            let (within, observed) = pairwise_within_threshold(&members, scanner.threshold);
            if within {
                return arena.cluster(all, &combo, observed, true);
            }
            FirstInvalid { combo, observed }
        }
    };
    arena.cluster(all, &combo, observed, false)
}
