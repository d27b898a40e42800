//! rush_hour: generate one hour of rush-hour trips for the 3x3 grid.
//!
//! Without arguments this writes the built-in scenario (4,158 vehicles, heavy
//! westbound motorcycle flow) to `output/rush_hour`.  Pass `--net-file` to
//! also run `duarouter` on the result.
//!
//! Exit status is non-zero if any bucket fell short of its target or the
//! route-assignment tool failed.

mod logging;


use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use td_core::DemandConfig;
use td_network::{BoundaryRegistry, load_registry_csv};
use td_pipeline::{DEFAULT_PREFIX, Duarouter, Pipeline, PipelineError};
use td_stream::{BucketReport, StreamObserver};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "rush_hour",
    about = "Generate rush-hour trip demand for a SUMO grid network"
)]
struct Cli {
    /// Demand configuration (JSON).  Built-in rush-hour scenario if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Boundary-edge registry (CSV: direction,role,edge).  Built-in 3x3 grid
    /// if omitted.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "output/rush_hour")]
    output_dir: PathBuf,

    /// File-name prefix for trip and route files.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Also write one merged, time-sorted trip file.
    #[arg(long)]
    merged: bool,

    /// Also write trips.csv and departure_histogram.csv.
    #[arg(long)]
    csv: bool,

    /// SUMO network.  Enables the route-assignment stage.
    #[arg(long)]
    net_file: Option<PathBuf>,

    /// duarouter executable.
    #[arg(long, default_value = "duarouter")]
    duarouter: PathBuf,

    /// -v for debug output, -vv for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn demand_config(&self) -> Result<DemandConfig> {
        let mut config = match &self.config {
            Some(path) => DemandConfig::load_json(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DemandConfig::rush_hour(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }

    fn boundary_registry(&self) -> Result<BoundaryRegistry> {
        match &self.registry {
            Some(path) => load_registry_csv(path).with_context(|| format!("loading {}", path.display())),
            None => Ok(BoundaryRegistry::grid_3x3()),
        }
    }
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// Prints one line per finished bucket.
struct BucketPrinter;

impl StreamObserver for BucketPrinter {
    fn on_bucket_done(&mut self, report: &BucketReport) {
        let status = if report.failure.is_some() { "FAILED" } else { "ok" };
        println!(
            "  {:<24} {:>5} / {:<5} {:>4} platoons  {status}",
            report.bucket.to_string(),
            report.emitted,
            report.target,
            report.platoons,
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.demand_config()?;
    let registry = cli.boundary_registry()?;

    println!("=== rush_hour: trip demand generator ===");
    println!(
        "Vehicles: {}  |  Horizon: {} s  |  Seed: {}",
        config.total_vehicles, config.horizon_secs, config.seed
    );
    println!("Output: {}", cli.output_dir.display());
    println!();

    let mut pipeline = Pipeline::new(&config, &registry, &cli.output_dir)
        .prefix(&cli.prefix)
        .merged(cli.merged)
        .csv(cli.csv);
    if let Some(net) = &cli.net_file {
        pipeline = pipeline.route_with(Duarouter::with_binary(&cli.duarouter, net));
    }

    let t0 = Instant::now();
    let outcome = match pipeline.run(&mut BucketPrinter) {
        Ok(outcome) => outcome,
        Err(PipelineError::Shortfall { missing, target, report }) => {
            println!();
            println!("{report}");
            anyhow::bail!("{missing} of {target} trips could not be generated");
        }
        Err(e) => return Err(e.into()),
    };
    let elapsed = t0.elapsed();

    println!();
    println!("Generated {} trips in {:.3} s", outcome.report.emitted_total(), elapsed.as_secs_f64());
    for (bucket, file) in &outcome.trips.bucket_files {
        println!("  {:<24} {}", bucket.to_string(), file.path.display());
    }
    if let Some(merged) = &outcome.trips.merged_file {
        println!("  {:<24} {}", "merged", merged.path.display());
    }
    println!("  {:<24} {}", "vehicle types", outcome.trips.vtypes_file.display());

    if let Some(routes) = &outcome.routes {
        println!();
        println!("Routes: {} vehicles in {}", routes.vehicles, routes.path.display());
        for w in &routes.warnings {
            println!("  warning: {w}");
        }
    }

    Ok(())
}
