//! Error types for td-pipeline.

use thiserror::Error;

use td_core::ConfigError;
use td_output::OutputError;
use td_stream::{GenerationReport, StreamError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Output(#[from] OutputError),

    /// Generation finished but some buckets fell short.  Trip files for the
    /// healthy buckets have been written; route assignment was skipped.
    #[error("{missing} of {target} trips could not be generated")]
    Shortfall {
        missing: usize,
        target:  usize,
        report:  GenerationReport,
    },

    #[error("could not start {tool}: {source}")]
    Spawn {
        tool:   String,
        source: std::io::Error,
    },

    #[error("{tool} failed ({status}): {stderr}")]
    ExternalTool {
        tool:   String,
        status: String,
        stderr: String,
    },

    #[error("route file {path}: {message}")]
    RouteFile { path: String, message: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
