//! `td-pipeline`: the generator as a two-stage batch job.
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`pipeline`] | `Pipeline`, `PipelineOutcome`                                   |
//! | [`route`]    | `RouteAssigner` trait, `Duarouter`, `RouteRequest`, `RouteArtifact` |
//! | [`error`]    | `PipelineError`, `PipelineResult<T>`                            |
//!
//! Stage 1 produces a typed [`TripArtifact`][td_output::TripArtifact];
//! stage 2 consumes it and produces a [`RouteArtifact`].  The route count is
//! read from the compiled route file itself, never from the tool's console
//! output.

pub mod error;
pub mod pipeline;
pub mod route;

#[cfg(test)]
mod tests;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{DEFAULT_PREFIX, Pipeline, PipelineOutcome};
pub use route::{Duarouter, RouteArtifact, RouteAssigner, RouteRequest, count_vehicles};
