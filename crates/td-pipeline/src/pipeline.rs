//! The two-stage pipeline: generate and write trips, then assign routes.

use std::path::{Path, PathBuf};

use log::{info, warn};

use td_core::DemandConfig;
use td_network::BoundaryRegistry;
use td_output::{CsvTripWriter, SumoTripWriter, TripArtifact, write_stream};
use td_stream::{GenerationReport, StreamObserver, TripStreamBuilder};

use crate::{PipelineError, PipelineResult, RouteArtifact, RouteAssigner, RouteRequest};

/// Default file-name prefix.
pub const DEFAULT_PREFIX: &str = "vn";

/// Everything a successful run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: GenerationReport,
    pub trips:  TripArtifact,
    /// `None` when no route assigner was configured.
    pub routes: Option<RouteArtifact>,
}

/// Generate → write → (optionally) assign routes.
///
/// Each stage runs only if the previous one fully succeeded: a generation
/// shortfall writes the trips that were produced and then stops with
/// [`PipelineError::Shortfall`]; a failing route assigner stops with its own
/// error.
pub struct Pipeline<'a> {
    config:     &'a DemandConfig,
    registry:   &'a BoundaryRegistry,
    output_dir: PathBuf,
    prefix:     String,
    merged:     bool,
    csv:        bool,
    router:     Option<Box<dyn RouteAssigner + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a DemandConfig, registry: &'a BoundaryRegistry, output_dir: &Path) -> Self {
        Self {
            config,
            registry,
            output_dir: output_dir.to_path_buf(),
            prefix: DEFAULT_PREFIX.to_string(),
            merged: false,
            csv: false,
            router: None,
        }
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Also write `{prefix}.all.trips.xml` and route from it.
    pub fn merged(mut self, merged: bool) -> Self {
        self.merged = merged;
        self
    }

    /// Also write `trips.csv` and `departure_histogram.csv`.
    pub fn csv(mut self, csv: bool) -> Self {
        self.csv = csv;
        self
    }

    pub fn route_with(mut self, router: impl RouteAssigner + 'a) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    /// Path of the route file the assignment stage writes.
    pub fn route_file(&self) -> PathBuf {
        self.output_dir.join(format!("{}.rou.xml", self.prefix))
    }

    pub fn run<O: StreamObserver>(&self, observer: &mut O) -> PipelineResult<PipelineOutcome> {
        // Stage 1: generate and write.
        let stream = TripStreamBuilder::new(self.config, self.registry)
            .merged(self.merged)
            .build(observer)?;

        let mut sumo = SumoTripWriter::new(&self.output_dir, &self.prefix)?;
        write_stream(&mut sumo, &stream)?;
        if self.csv {
            let mut csv = CsvTripWriter::new(&self.output_dir, self.config.horizon_secs)?;
            write_stream(&mut csv, &stream)?;
        }
        let trips = sumo.into_artifact();
        let report = stream.report;

        if !report.is_complete() {
            warn!("generation incomplete; skipping route assignment\n{report}");
            return Err(PipelineError::Shortfall {
                missing: report.shortfall_total(),
                target:  report.target_total(),
                report,
            });
        }
        info!("stage 1 done: {} trips written to {}", trips.trips_written(), self.output_dir.display());

        // Stage 2: route assignment.
        let routes = match &self.router {
            Some(router) => {
                let request = RouteRequest {
                    trip_files:    trips.route_inputs().into_iter().map(Path::to_path_buf).collect(),
                    vtypes_file:   trips.vtypes_file.clone(),
                    output_file:   self.route_file(),
                    horizon_secs:  self.config.horizon_secs,
                    trips_written: trips.trips_written(),
                };
                let artifact = router.assign(&request)?;
                info!("stage 2 done: {} routed {} vehicles", router.name(), artifact.vehicles);
                Some(artifact)
            }
            None => None,
        };

        Ok(PipelineOutcome { report, trips, routes })
    }
}
