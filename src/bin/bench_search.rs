//! Benchmark the cluster search on random catalogs.
//!
//! Run with: cargo run --release --bin bench_search
//!
//! Usage:
//!   bench_search                 Run default size (600 points)
//!   bench_search 300 1k 3k       Run multiple sizes (total points)
//!   bench_search -k 4 --spread 5000
//!   bench_search -n 10           Run 10 iterations (for profiling)
//!
//! Points are spread uniformly in a square around the centre and split evenly
//! across categories. Brute force is skipped once its cross product exceeds
//! `--max-brute`.

use std::io::{self, Write};
use std::time::Instant;

use clap::Parser;
use colocate::{find_clusters, plan, Catalog, Cluster, Point, Strategy};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const METERS_PER_DEGREE: f64 = 111_000.0;

fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.to_lowercase();
    let (num_str, multiplier) = if s.ends_with('m') {
        (&s[..s.len() - 1], 1_000_000)
    } else if s.ends_with('k') {
        (&s[..s.len() - 1], 1_000)
    } else {
        (s.as_str(), 1)
    };

    num_str
        .parse::<f64>()
        .map(|n| (n * multiplier as f64) as usize)
        .map_err(|e| format!("Invalid number '{}': {}", s, e))
}

#[derive(Parser)]
#[command(name = "bench_search")]
#[command(about = "Benchmark pruned vs brute-force cluster search")]
struct Args {
    /// Total point counts to benchmark (e.g., 300, 2k, 10k)
    #[arg(value_parser = parse_count)]
    sizes: Vec<usize>,

    /// Random seed
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Number of categories
    #[arg(short = 'k', long, default_value_t = 3)]
    categories: usize,

    /// Distance threshold in meters
    #[arg(short, long, default_value_t = 200.0)]
    threshold: f64,

    /// Half-width of the sampled square in meters
    #[arg(long, default_value_t = 2_000.0)]
    spread: f64,

    /// Centre latitude
    #[arg(long, default_value_t = 39.9042)]
    lat: f64,

    /// Centre longitude
    #[arg(long, default_value_t = 116.4074)]
    lon: f64,

    /// Skip brute force above this many full-coverage combinations
    #[arg(long, default_value_t = 20_000_000)]
    max_brute: u128,

    /// Number of iterations to run (useful for profiling)
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: usize,
}

fn generate_catalog(n: usize, args: &Args) -> Catalog {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let k = args.categories.max(1);
    let dlat = args.spread / METERS_PER_DEGREE;
    let dlon = dlat / args.lat.to_radians().cos().max(1e-6);

    let mut catalog = Catalog::new();
    for c in 0..k {
        let count = n / k + usize::from(c < n % k);
        let points = (0..count)
            .map(|i| {
                let lat = (args.lat + rng.gen_range(-dlat..dlat)).clamp(-90.0, 90.0);
                let lon = (args.lon + rng.gen_range(-dlon..dlon)).clamp(-180.0, 180.0);
                Point::new(lat, lon).with_name(format!("poi-{}-{}", c, i))
            })
            .collect();
        catalog
            .insert(format!("category-{}", c), points)
            .expect("category names are unique");
    }
    catalog
}

fn format_rate(count: u128, ms: f64) -> String {
    if ms <= 0.0 {
        return "N/A".to_string();
    }
    let per_sec = count as f64 / (ms / 1000.0);
    if per_sec >= 1_000_000.0 {
        format!("{:.2}M/s", per_sec / 1_000_000.0)
    } else if per_sec >= 1_000.0 {
        format!("{:.1}k/s", per_sec / 1000.0)
    } else {
        format!("{:.0}/s", per_sec)
    }
}

fn format_num(n: u128) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{}k", n / 1_000)
    } else {
        format!("{}", n)
    }
}

struct Timed {
    time_ms: f64,
    clusters: Vec<Cluster>,
}

fn time_search(catalog: &Catalog, threshold: f64, strategy: Strategy, repeat: usize) -> Timed {
    let mut best = f64::INFINITY;
    let mut clusters = Vec::new();
    for iter in 0..repeat.max(1) {
        if repeat > 1 {
            print!("  {} iteration {}/{}... ", strategy, iter + 1, repeat);
            let _ = io::stdout().flush();
        }
        let t0 = Instant::now();
        clusters = match find_clusters(catalog, threshold, strategy) {
            Ok(clusters) => clusters,
            Err(e) => {
                eprintln!("search failed: {}", e);
                std::process::exit(1);
            }
        };
        let ms = t0.elapsed().as_secs_f64() * 1000.0;
        if repeat > 1 {
            println!("{:.1}ms", ms);
        }
        best = best.min(ms);
    }
    Timed {
        time_ms: best,
        clusters,
    }
}

struct BenchResult {
    n: usize,
    full: u128,
    pruned: u128,
    pruned_ms: f64,
    brute_ms: Option<f64>,
    clusters: usize,
}

fn main() {
    let args = Args::parse();

    println!("colocate search benchmark");
    println!("=========================\n");

    let sizes: Vec<usize> = if args.sizes.is_empty() {
        vec![600]
    } else {
        args.sizes.clone()
    };

    println!("Configuration:");
    println!("  seed = {}", args.seed);
    println!("  categories = {}", args.categories);
    println!("  threshold = {}m, spread = {}m", args.threshold, args.spread);
    println!("  centre = ({}, {})", args.lat, args.lon);
    println!(
        "  sizes = {:?}",
        sizes.iter().map(|&n| format_num(n as u128)).collect::<Vec<_>>()
    );

    let mut results = Vec::new();

    for &n in &sizes {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking n = {}", format_num(n as u128));
        println!("{}", "=".repeat(60));

        let catalog = generate_catalog(n, &args);
        let estimate = match plan(&catalog, args.threshold, Strategy::Pruned) {
            Ok(estimate) => estimate,
            Err(e) => {
                eprintln!("plan failed: {}", e);
                std::process::exit(1);
            }
        };
        let pruned_count = estimate.combinations();
        println!(
            "Full-coverage combinations: {} full, {} pruned",
            format_num(estimate.full_combinations),
            format_num(pruned_count)
        );

        let pruned = time_search(&catalog, args.threshold, Strategy::Pruned, args.repeat);

        let brute_ms = if estimate.full_combinations <= args.max_brute {
            let brute = time_search(&catalog, args.threshold, Strategy::BruteForce, args.repeat);
            assert_eq!(
                pruned.clusters, brute.clusters,
                "pruned and brute-force results differ for n={}",
                n
            );
            Some(brute.time_ms)
        } else {
            println!("  (skipping brute force: above --max-brute)");
            None
        };

        println!("\nResults:");
        println!(
            "  Pruned:        {:>8.1}ms ({})",
            pruned.time_ms,
            format_rate(pruned_count, pruned.time_ms)
        );
        if let Some(ms) = brute_ms {
            println!(
                "  Brute force:   {:>8.1}ms ({:.1}x slower)",
                ms,
                ms / pruned.time_ms.max(1e-9)
            );
        }
        println!("  Clusters:      {:>8}", pruned.clusters.len());

        results.push(BenchResult {
            n,
            full: estimate.full_combinations,
            pruned: pruned_count,
            pruned_ms: pruned.time_ms,
            brute_ms,
            clusters: pruned.clusters.len(),
        });
    }

    if results.len() > 1 {
        println!("\n\n{}", "=".repeat(60));
        println!("SUMMARY");
        println!("{}", "=".repeat(60));
        println!(
            "{:>8} | {:>8} | {:>8} | {:>10} | {:>10} | {:>8}",
            "n", "full", "pruned", "pruned", "brute", "clusters"
        );
        println!(
            "{:-<8}-+-{:-<8}-+-{:-<8}-+-{:-<10}-+-{:-<10}-+-{:-<8}",
            "", "", "", "", "", ""
        );
        for r in &results {
            let brute = r
                .brute_ms
                .map(|ms| format!("{:.1}ms", ms))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>8} | {:>8} | {:>8} | {:>8.1}ms | {:>10} | {:>8}",
                format_num(r.n as u128),
                format_num(r.full),
                format_num(r.pruned),
                r.pruned_ms,
                brute,
                r.clusters
            );
        }
    }

    println!("\nBenchmark complete.");
}
