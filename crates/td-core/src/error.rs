//! Configuration error type.
//!
//! Every variant is fatal at startup: a run never begins generating with a
//! configuration that failed [`DemandConfig::validate`][crate::DemandConfig::validate].

use thiserror::Error;

use crate::VehicleClass;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("class shares sum to {sum:.3}%, expected 100%")]
    ClassShareSum { sum: f64 },

    #[error("direction shares for {class} sum to {sum:.3}%, expected 100%")]
    DirectionShareSum { class: VehicleClass, sum: f64 },

    #[error("{class} has a non-zero share but no directions")]
    NoDirections { class: VehicleClass },

    #[error("negative or non-finite share {value} for {what}")]
    InvalidShare { what: String, value: f64 },

    #[error("horizon must be positive and finite, got {0}")]
    Horizon(f64),

    #[error("demand curve: {0}")]
    Curve(String),

    #[error("platoon parameters for {class}: {reason}")]
    Platoon { class: VehicleClass, reason: String },

    #[error("attempt budget factor must be at least 1")]
    AttemptBudget,

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;
