//! The `TripWriter` trait implemented by all backend writers.

use td_core::{BucketId, TripRecord};
use td_stream::TripStream;

use crate::OutputResult;

/// Trait implemented by the SUMO and CSV writers.
pub trait TripWriter {
    /// Write the trips of one bucket, sorted by departure.
    fn write_bucket(&mut self, bucket: BucketId, trips: &[TripRecord]) -> OutputResult<()>;

    /// Write the globally merged trip list.  Backends without a merged
    /// representation ignore it.
    fn write_merged(&mut self, _trips: &[TripRecord]) -> OutputResult<()> {
        Ok(())
    }

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Feed a whole [`TripStream`] to `writer` and finish it.
///
/// Buckets that emitted nothing are skipped, so a failed bucket never leaves
/// an empty trip file behind.
pub fn write_stream<W: TripWriter + ?Sized>(writer: &mut W, stream: &TripStream) -> OutputResult<()> {
    for b in stream.buckets.iter().filter(|b| !b.trips.is_empty()) {
        writer.write_bucket(b.bucket.id, &b.trips)?;
    }
    if let Some(merged) = &stream.merged {
        writer.write_merged(merged)?;
    }
    writer.finish()
}
