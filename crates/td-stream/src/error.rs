use thiserror::Error;

use td_core::ConfigError;
use td_network::InvalidEndpointError;
use td_profile::GenerationError;

/// Errors that abort the whole stream build.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("trip id {0} produced by more than one bucket")]
    DuplicateTripId(String),
}

pub type StreamResult<T> = Result<T, StreamError>;

/// Why a single bucket fell short of its target.  Recorded in the
/// [`GenerationReport`][crate::GenerationReport]; never aborts other buckets.
#[derive(Debug, Error)]
pub enum BucketFailure {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Endpoint(#[from] InvalidEndpointError),
}
