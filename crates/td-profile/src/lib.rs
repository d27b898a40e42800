//! `td-profile`: turning a target count into departure times.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`curve`]   | `DemandCurve` (piecewise-linear multiplier, integral)     |
//! | [`sampler`] | `DepartureSampler` (rejection sampling with draw budget)  |
//! | [`platoon`] | `PlatoonGenerator`, `Departure`, `PlatoonStats`           |
//! | [`error`]   | `GenerationError`, `GenerationResult<T>`                  |
//!
//! # Ordering
//!
//! Shaping happens before clustering: the sampler draws `N` anchors from the
//! curve, then the platoon generator groups consecutive anchors.  A platoon's
//! members are placed around its first anchor, so the curve governs where
//! platoons *start*, not where each member departs.

pub mod curve;
pub mod error;
pub mod platoon;
pub mod sampler;


pub use curve::DemandCurve;
pub use error::{GenerationError, GenerationResult};
pub use platoon::{Departure, PlatoonGenerator, PlatoonStats};
pub use sampler::DepartureSampler;
