//! Find co-located points of interest in a JSON catalog.
//!
//! Usage:
//!   colocate --catalog pois.json                    Default 200 m threshold
//!   colocate --catalog pois.json -t 150 --format json
//!   colocate --catalog pois.json --strategy brute-force --fallback best-effort
//!   COLOCATE_THRESHOLD=300 colocate --catalog pois.json
//!
//! The catalog is a JSON object mapping each category to an array of points
//! (`{"name", "address", "lat", "lon"}`); key order is search order.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use colocate::{
    find_clusters_with, plan, report, Catalog, Fallback, NoProgress, ProgressSink, SearchConfig,
    Strategy, TracingProgress, DEFAULT_THRESHOLD_METERS,
};

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum StrategyArg {
    /// Spatial grid with per-point candidates
    #[default]
    Pruned,
    /// Full cross product
    BruteForce,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Pruned => Strategy::Pruned,
            StrategyArg::BruteForce => Strategy::BruteForce,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum FallbackArg {
    /// Return nothing
    #[default]
    Empty,
    /// Return one cluster flagged as not valid
    BestEffort,
}

impl From<FallbackArg> for Fallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Empty => Fallback::Empty,
            FallbackArg::BestEffort => Fallback::BestEffort,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    #[default]
    Log,
    /// JSON document
    Json,
}

#[derive(Parser)]
#[command(name = "colocate")]
#[command(about = "Find points of interest of different categories within a distance threshold")]
struct Args {
    /// JSON catalog file
    #[arg(short, long)]
    catalog: PathBuf,

    /// Distance threshold in meters
    #[arg(short, long, env = "COLOCATE_THRESHOLD", default_value_t = DEFAULT_THRESHOLD_METERS)]
    threshold: f64,

    #[arg(long, value_enum, default_value_t = StrategyArg::Pruned)]
    strategy: StrategyArg,

    /// Result when nothing of two or more categories matches
    #[arg(long, value_enum, default_value_t = FallbackArg::Empty)]
    fallback: FallbackArg,

    #[arg(long, value_enum, default_value_t = OutputFormat::Log)]
    format: OutputFormat,

    /// Label for the searched area, included in the output
    #[arg(long)]
    locality: Option<String>,

    /// Refuse to search if the full-coverage stage would examine more combinations
    #[arg(long)]
    max_combinations: Option<u128>,

    /// Log progress (-v) or engine internals (-vv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_catalog(path: &PathBuf) -> Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = Catalog::from_json_str(&text)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;

    let mut kept = Catalog::new();
    for (name, points) in catalog.iter() {
        if points.is_empty() {
            tracing::warn!(category = name, "category has no points, skipping");
            continue;
        }
        kept.insert(name, points.to_vec())?;
    }
    Ok(kept)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let catalog = load_catalog(&args.catalog)?;
    let strategy = Strategy::from(args.strategy);
    tracing::info!(
        categories = catalog.len(),
        points = catalog.total_points(),
        threshold = args.threshold,
        %strategy,
        "catalog loaded"
    );

    if let Some(limit) = args.max_combinations {
        let estimate = plan(&catalog, args.threshold, strategy)?;
        tracing::info!(
            full = %estimate.full_combinations,
            pruned = ?estimate.pruned_combinations,
            "search plan"
        );
        if estimate.combinations() > limit {
            bail!(
                "search would examine {} combinations, above the limit of {}",
                estimate.combinations(),
                limit
            );
        }
    }

    let config = SearchConfig::default()
        .with_strategy(strategy)
        .with_fallback(args.fallback.into());
    let mut tracing_sink = TracingProgress;
    let mut silent = NoProgress;
    let progress: &mut dyn ProgressSink = if args.verbose > 0 {
        &mut tracing_sink
    } else {
        &mut silent
    };

    let t0 = Instant::now();
    let output = find_clusters_with(&catalog, args.threshold, &config, progress)?;
    tracing::info!(
        outcome = ?output.diagnostics.outcome,
        clusters = output.clusters.len(),
        examined = output.diagnostics.combinations_examined,
        elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0,
        "search finished"
    );

    let text = match args.format {
        OutputFormat::Log => {
            let mut summary = report::ResultReport::new(&output.clusters);
            if let Some(locality) = args.locality.as_deref() {
                summary = summary.with_locality(locality);
            }
            summary.to_string()
        }
        OutputFormat::Json => report::to_json(&output.clusters, args.locality.as_deref())?,
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    Ok(())
}
