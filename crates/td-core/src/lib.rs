//! `td-core`: foundational types for the trip-demand generator.
//!
//! This crate is a dependency of every other `td-*` crate and has no `td-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `VehicleClass`, `Direction`, `BucketId`, `TripId`, `EdgeId` |
//! | [`trip`]   | `TripRecord`, departure quantization                        |
//! | [`rng`]    | `BucketRng` (per-bucket, seeded from run seed + bucket)     |
//! | [`config`] | `DemandConfig`, `ClassConfig`, `PlatoonParams`, `CurvePoint` |
//! | [`error`]  | `ConfigError`, `ConfigResult`                               |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod trip;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    ClassConfig, CurvePoint, DemandConfig, PlatoonParams, SHARE_TOLERANCE_PCT, rush_hour_curve,
    validate_curve,
};
pub use error::{ConfigError, ConfigResult};
pub use ids::{BucketId, Direction, EdgeId, TripId, VehicleClass};
pub use rng::BucketRng;
pub use trip::{DEPART_DECIMALS, TripRecord, clamp_depart, quantize_depart};
