//! Network-subsystem error types.

use thiserror::Error;

use td_core::Direction;

/// A direction cannot produce a valid (origin, destination) pair.
///
/// Fatal to every bucket using that direction, recoverable at run level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidEndpointError {
    #[error("no {role} edges registered for {direction}")]
    NoEdges {
        direction: Direction,
        role:      &'static str,
    },

    #[error("every {direction} entry/exit pair is the same or an adjacent edge")]
    NoValidPairs { direction: Direction },
}

/// Errors produced while loading a boundary registry.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("registry parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
