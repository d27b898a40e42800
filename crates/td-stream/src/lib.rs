//! `td-stream`: from configuration to trip records.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`mix`]       | `VehicleClassMix`, `Bucket`, largest-remainder `apportion`    |
//! | [`builder`]   | `TripStreamBuilder`, `BuildPhase`, `TripStream`, `BucketTrips` |
//! | [`report`]    | `GenerationReport`, `BucketReport`                            |
//! | [`histogram`] | `DepartureHistogram`                                          |
//! | [`observer`]  | `StreamObserver` trait, `NoopObserver`                        |
//! | [`error`]     | `StreamError`, `BucketFailure`, `StreamResult<T>`             |
//!
//! # Determinism
//!
//! Each bucket draws from a [`BucketRng`][td_core::BucketRng] seeded with the
//! run seed and the bucket id, and uses it for sampling, clustering, and
//! endpoint assignment in that order.  A bucket's trips are therefore fixed
//! by `(seed, config, registry)` alone, and enabling the `parallel` feature
//! changes nothing in the output.

pub mod builder;
pub mod error;
pub mod histogram;
pub mod mix;
pub mod observer;
pub mod report;

#[cfg(test)]
mod tests;

pub use builder::{BucketTrips, BuildPhase, TripStream, TripStreamBuilder};
pub use error::{BucketFailure, StreamError, StreamResult};
pub use histogram::{DEFAULT_BIN_SECS, DepartureHistogram};
pub use mix::{Bucket, VehicleClassMix, apportion};
pub use observer::{NoopObserver, StreamObserver};
pub use report::{BucketReport, GenerationReport};
