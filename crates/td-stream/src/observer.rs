//! Build observer trait for progress reporting.

use crate::{BucketReport, BuildPhase};

/// Callbacks invoked by [`TripStreamBuilder::build`][crate::TripStreamBuilder::build].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait StreamObserver {
    /// Called on every phase transition, including the final `Done`.
    fn on_phase(&mut self, _phase: BuildPhase) {}

    /// Called once per bucket, in generation order, after it succeeded or
    /// failed.
    fn on_bucket_done(&mut self, _report: &BucketReport) {}

    /// Called after merging with the total number of trips.
    fn on_merged(&mut self, _total: usize) {}
}

/// A [`StreamObserver`] that does nothing.
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}
