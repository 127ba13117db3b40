//! Degradation to category subsets and the terminal fallback.

mod support;

use colocate::{
    find_clusters, find_clusters_with, haversine_distance, Cluster, Fallback, NoProgress, Outcome,
    SearchConfig, Strategy,
};
use support::points::{catalog_of, offset};

const STRATEGIES: [Strategy; 2] = [Strategy::Pruned, Strategy::BruteForce];

fn categories(cluster: &Cluster) -> Vec<&str> {
    cluster.categories().collect()
}

#[test]
fn test_far_category_degrades_to_pair() {
    let a = (39.9, 116.4);
    let b = offset(a.0, a.1, 60.0, 0.0);
    let c = (39.945, 116.4);
    assert!(haversine_distance(a.0, a.1, c.0, c.1) > 4_900.0);
    assert!(haversine_distance(b.0, b.1, c.0, c.1) > 4_900.0);

    let catalog = catalog_of(&[("A", &[a]), ("B", &[b]), ("C", &[c])]);
    let expected = haversine_distance(a.0, a.1, b.0, b.1);
    assert!((expected - 60.0).abs() < 0.5);

    for strategy in STRATEGIES {
        let clusters = find_clusters(&catalog, 200.0, strategy).unwrap();
        assert!(clusters.iter().all(|c| c.category_count() < 3));

        let pair = clusters
            .iter()
            .find(|c| categories(c) == ["A", "B"])
            .expect("A and B should pair up");
        assert!(pair.is_valid());
        assert_eq!(pair.max_distance(), expected);
    }
}

#[test]
fn test_sweep_collects_every_subset_size() {
    // A, B, C0 form a triangle; C1 and D0 form a pair far away.
    let catalog = catalog_of(&[
        ("A", &[(39.9000, 116.4000)]),
        ("B", &[(39.9003, 116.4000)]),
        ("C", &[(39.9000, 116.4003), (39.9500, 116.4500)]),
        ("D", &[(39.9503, 116.4500)]),
    ]);

    for strategy in STRATEGIES {
        let out = find_clusters_with(
            &catalog,
            200.0,
            &SearchConfig::default().with_strategy(strategy),
            &mut NoProgress,
        )
        .unwrap();
        assert_eq!(out.diagnostics.outcome, Outcome::Degraded);

        let found: Vec<Vec<&str>> = out.clusters.iter().map(categories).collect();
        assert_eq!(
            found,
            vec![
                vec!["A", "B", "C"],
                vec!["A", "B"],
                vec!["A", "C"],
                vec!["B", "C"],
                vec!["C", "D"],
            ],
            "{}",
            strategy
        );
        assert!(out.clusters.iter().all(Cluster::is_valid));
        assert_eq!(out.clusters[4].get("C").map(|p| p.lat), Some(39.95));
    }
}

#[test]
fn test_results_sorted_by_category_count() {
    let catalog = catalog_of(&[
        ("A", &[(10.0, 10.0), (20.0, 20.0)]),
        ("B", &[(10.0005, 10.0)]),
        ("C", &[(20.0, 20.0005), (10.0, 10.0005)]),
        ("D", &[(20.0005, 20.0)]),
        ("E", &[(-30.0, -30.0)]),
    ]);

    let clusters = find_clusters(&catalog, 200.0, Strategy::BruteForce).unwrap();
    let counts: Vec<usize> = clusters.iter().map(Cluster::category_count).collect();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
    assert_eq!(counts[0], 3);
    assert!(clusters.iter().all(|c| c.get("E").is_none()));
}

#[test]
fn test_two_far_categories_no_match() {
    let catalog = catalog_of(&[("A", &[(39.9, 116.4)]), ("B", &[(31.2304, 121.4737)])]);

    for strategy in STRATEGIES {
        let out = find_clusters_with(
            &catalog,
            200.0,
            &SearchConfig::default().with_strategy(strategy),
            &mut NoProgress,
        )
        .unwrap();
        assert!(out.clusters.is_empty());
        assert_eq!(out.diagnostics.outcome, Outcome::NoMatch);
    }
}

#[test]
fn test_best_effort_not_used_when_subsets_match() {
    let catalog = catalog_of(&[
        ("A", &[(39.9000, 116.4000)]),
        ("B", &[(39.9003, 116.4000)]),
        ("C", &[(45.0, 100.0)]),
    ]);
    let config = SearchConfig::default().with_fallback(Fallback::BestEffort);

    let out = find_clusters_with(&catalog, 200.0, &config, &mut NoProgress).unwrap();
    assert_eq!(out.diagnostics.outcome, Outcome::Degraded);
    assert_eq!(out.clusters.len(), 1);
    assert!(out.clusters[0].is_valid());
}

#[test]
fn test_best_effort_reports_first_rejected_assignment() {
    let catalog = catalog_of(&[
        ("A", &[(0.0, 0.0), (0.0, 0.5)]),
        ("B", &[(0.0, 0.01)]),
        ("C", &[(0.0, 0.02)]),
    ]);
    let config = SearchConfig::default()
        .with_strategy(Strategy::BruteForce)
        .with_fallback(Fallback::BestEffort);

    let out = find_clusters_with(&catalog, 100.0, &config, &mut NoProgress).unwrap();
    assert_eq!(out.diagnostics.outcome, Outcome::BestEffort);
    assert_eq!(out.clusters.len(), 1);

    let cluster = &out.clusters[0];
    assert!(!cluster.is_valid());
    assert_eq!(categories(cluster), vec!["A", "B", "C"]);
    assert_eq!(cluster.get("A").map(|p| p.lon), Some(0.0));
    // Short-circuit value: the first violating pair (A, B).
    assert_eq!(
        cluster.max_distance(),
        haversine_distance(0.0, 0.0, 0.0, 0.01)
    );
    let true_max = colocate::max_pairwise_distance(&cluster.points().collect::<Vec<_>>());
    assert!(true_max > cluster.max_distance());
}
