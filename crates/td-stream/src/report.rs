//! Per-run generation summary.

use std::fmt;

use td_core::BucketId;

use crate::BucketFailure;

/// Outcome of one bucket.
#[derive(Debug)]
pub struct BucketReport {
    pub bucket:    BucketId,
    pub target:    usize,
    pub emitted:   usize,
    /// Number of platoons formed.
    pub platoons:  usize,
    /// Vehicles travelling in a platoon.
    pub platooned: usize,
    pub failure:   Option<BucketFailure>,
}

impl BucketReport {
    pub fn shortfall(&self) -> usize {
        self.target.saturating_sub(self.emitted)
    }
}

/// Every bucket's outcome, in generation order.
///
/// A run is *complete* when every bucket emitted its full target.  Partial
/// runs still produce output for the buckets that succeeded; the report is
/// how the caller finds out what is missing.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub buckets: Vec<BucketReport>,
}

impl GenerationReport {
    pub fn target_total(&self) -> usize {
        self.buckets.iter().map(|b| b.target).sum()
    }

    pub fn emitted_total(&self) -> usize {
        self.buckets.iter().map(|b| b.emitted).sum()
    }

    pub fn shortfall_total(&self) -> usize {
        self.buckets.iter().map(BucketReport::shortfall).sum()
    }

    /// Buckets that emitted fewer trips than targeted.  A failed bucket
    /// with a zero target is missing nothing and is not listed.
    pub fn shortfalls(&self) -> impl Iterator<Item = &BucketReport> {
        self.buckets.iter().filter(|b| b.shortfall() > 0)
    }

    pub fn is_complete(&self) -> bool {
        self.shortfalls().next().is_none()
    }

    pub fn bucket(&self, id: BucketId) -> Option<&BucketReport> {
        self.buckets.iter().find(|b| b.bucket == id)
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<24} {:>7} {:>7} {:>8}", "bucket", "target", "emitted", "platoons")?;
        for b in &self.buckets {
            write!(f, "{:<24} {:>7} {:>7} {:>8}", b.bucket.to_string(), b.target, b.emitted, b.platoons)?;
            if let Some(failure) = &b.failure {
                write!(f, "  FAILED: {failure}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{:<24} {:>7} {:>7}", "total", self.target_total(), self.emitted_total())
    }
}
