//! Route-assignment stage.
//!
//! Trip files only name an origin and a destination edge; an external tool
//! computes the actual routes.  The stage is a trait so tests and other
//! tools can stand in for SUMO's `duarouter`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::{PipelineError, PipelineResult};

/// Inputs of one route-assignment run.
#[derive(Clone, Debug)]
pub struct RouteRequest {
    pub trip_files:    Vec<PathBuf>,
    pub vtypes_file:   PathBuf,
    pub output_file:   PathBuf,
    pub horizon_secs:  f64,
    /// Trips contained in `trip_files`, for drop detection.
    pub trips_written: usize,
}

/// A compiled route file and how it compares with the trips that went in.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteArtifact {
    pub path:     PathBuf,
    /// `vehicle` elements in the route file.
    pub vehicles: usize,
    /// Trips the tool discarded (unroutable, invalid edges).
    pub dropped:  usize,
    pub warnings: Vec<String>,
}

impl RouteArtifact {
    /// Parse the route file at `path` and compare it with `trips_written`.
    pub fn read(path: &Path, trips_written: usize) -> PipelineResult<Self> {
        let vehicles = count_vehicles(path)?;
        let dropped = trips_written.saturating_sub(vehicles);
        let mut warnings = Vec::new();
        if dropped > 0 {
            let msg = format!("{dropped} of {trips_written} trips were dropped during route assignment");
            warn!("{msg}");
            warnings.push(msg);
        }
        Ok(Self { path: path.to_path_buf(), vehicles, dropped, warnings })
    }
}

/// Count `vehicle` elements in a SUMO route file.
pub fn count_vehicles(path: &Path) -> PipelineResult<usize> {
    let route_err = |message: String| PipelineError::RouteFile {
        path: path.display().to_string(),
        message,
    };

    let file = File::open(path).map_err(|e| route_err(e.to_string()))?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    let mut buf = Vec::new();
    let mut vehicles = 0;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"vehicle" => vehicles += 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(route_err(format!(
                    "XML error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }
    Ok(vehicles)
}

// ── RouteAssigner ─────────────────────────────────────────────────────────────

/// Second pipeline stage: turn trip files into a route file.
pub trait RouteAssigner {
    /// Human-readable tool name for logs and errors.
    fn name(&self) -> &str;

    /// Run assignment.  Must fail, never return a partial artifact, when the
    /// tool itself fails.
    fn assign(&self, request: &RouteRequest) -> PipelineResult<RouteArtifact>;
}

/// SUMO's `duarouter`, run as a child process.
#[derive(Clone, Debug)]
pub struct Duarouter {
    binary:   PathBuf,
    net_file: PathBuf,
}

impl Duarouter {
    /// Use `duarouter` from `PATH`.
    pub fn new(net_file: impl Into<PathBuf>) -> Self {
        Self::with_binary("duarouter", net_file)
    }

    pub fn with_binary(binary: impl Into<PathBuf>, net_file: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), net_file: net_file.into() }
    }

    /// The command line for `request`, without running it.
    pub fn command(&self, request: &RouteRequest) -> Command {
        let route_files = request
            .trip_files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--net-file")
            .arg(&self.net_file)
            .arg("--route-files")
            .arg(route_files)
            .arg("--additional-files")
            .arg(&request.vtypes_file)
            .arg("--output-file")
            .arg(&request.output_file)
            .arg("--begin")
            .arg("0")
            .arg("--end")
            .arg(request.horizon_secs.to_string())
            .arg("--ignore-errors")
            .arg("--no-step-log");
        cmd
    }
}

impl RouteAssigner for Duarouter {
    fn name(&self) -> &str {
        "duarouter"
    }

    fn assign(&self, request: &RouteRequest) -> PipelineResult<RouteArtifact> {
        let tool = self.binary.display().to_string();
        info!("running {tool} on {} trip file(s)", request.trip_files.len());

        let output = self
            .command(request)
            .output()
            .map_err(|source| PipelineError::Spawn { tool: tool.clone(), source })?;
        if !output.status.success() {
            return Err(PipelineError::ExternalTool {
                tool,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let artifact = RouteArtifact::read(&request.output_file, request.trips_written)?;
        info!(
            "{tool}: {} vehicles routed into {}",
            artifact.vehicles,
            artifact.path.display()
        );
        Ok(artifact)
    }
}
