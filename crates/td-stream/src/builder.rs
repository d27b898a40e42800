//! `TripStreamBuilder`: runs every bucket and merges the results.

use log::{debug, info, warn};
use rustc_hash::FxHashSet;

use td_core::{BucketId, BucketRng, DemandConfig, TripId, TripRecord};
use td_network::{BoundaryRegistry, OdAssigner};
use td_profile::{DemandCurve, DepartureSampler, PlatoonGenerator, PlatoonStats};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    Bucket, BucketFailure, BucketReport, GenerationReport, StreamError, StreamObserver,
    StreamResult, VehicleClassMix,
};

/// Where a build currently is.
///
/// `Idle → GeneratingBucket(b₁) → … → GeneratingBucket(bₙ) → Merging → Done`.
/// Buckets are visited in the mix's fixed order.  Sequential builds enter
/// `GeneratingBucket(b)` before `b` is generated.  With the `parallel`
/// feature every bucket is generated up front and the phase is reported as
/// each bucket's result is committed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BuildPhase {
    Idle,
    GeneratingBucket(BucketId),
    Merging,
    Done,
}

/// The trips of one bucket, sorted by departure.
#[derive(Clone, Debug)]
pub struct BucketTrips {
    pub bucket: Bucket,
    pub trips:  Vec<TripRecord>,
}

/// Everything a build produced.
#[derive(Debug)]
pub struct TripStream {
    /// One entry per bucket in generation order; failed buckets are empty.
    pub buckets: Vec<BucketTrips>,
    /// All trips sorted by departure, present when merging was requested.
    pub merged:  Option<Vec<TripRecord>>,
    pub report:  GenerationReport,
}

impl TripStream {
    /// Every trip, bucket by bucket.
    pub fn trips(&self) -> impl Iterator<Item = &TripRecord> {
        self.buckets.iter().flat_map(|b| b.trips.iter())
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.trips.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Turns a [`DemandConfig`] and a [`BoundaryRegistry`] into trip records.
///
/// # Example
///
/// ```rust,ignore
/// let config = DemandConfig::rush_hour();
/// let registry = BoundaryRegistry::grid_3x3();
/// let stream = TripStreamBuilder::new(&config, &registry)
///     .merged(true)
///     .build(&mut NoopObserver)?;
/// assert!(stream.report.is_complete());
/// ```
pub struct TripStreamBuilder<'a> {
    config:   &'a DemandConfig,
    registry: &'a BoundaryRegistry,
    merge:    bool,
    phase:    BuildPhase,
}

/// Shared, read-only inputs for every bucket.
struct BucketContext {
    seed:          u64,
    budget_factor: u32,
    curve:         DemandCurve,
    assigner:      OdAssigner,
}

impl<'a> TripStreamBuilder<'a> {
    pub fn new(config: &'a DemandConfig, registry: &'a BoundaryRegistry) -> Self {
        Self { config, registry, merge: false, phase: BuildPhase::Idle }
    }

    /// Also produce one globally time-sorted list of all trips.
    pub fn merged(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Generate every bucket.
    ///
    /// A bucket that cannot be generated (no valid endpoints, exhausted
    /// sampling budget) emits nothing and is recorded in the report; the
    /// other buckets are unaffected.  Only an invalid configuration or a
    /// duplicate trip id aborts the build.
    pub fn build<O: StreamObserver>(&mut self, observer: &mut O) -> StreamResult<TripStream> {
        self.config.validate()?;
        let ctx = BucketContext {
            seed:          self.config.seed,
            budget_factor: self.config.attempt_budget_factor,
            curve:         DemandCurve::from_config(self.config)?,
            assigner:      OdAssigner::new(self.registry),
        };
        let mix = VehicleClassMix::from_config(self.config);
        info!(
            "generating {} trips in {} buckets (seed {})",
            mix.total(),
            mix.buckets().len(),
            ctx.seed
        );

        #[cfg(feature = "parallel")]
        let mut generated = generate_all(&ctx, mix.buckets()).into_iter();

        let mut buckets = Vec::with_capacity(mix.buckets().len());
        let mut report = GenerationReport::default();
        for bucket in mix.buckets() {
            self.set_phase(BuildPhase::GeneratingBucket(bucket.id), observer);
            #[cfg(not(feature = "parallel"))]
            let result = generate_bucket(&ctx, bucket);
            #[cfg(feature = "parallel")]
            let Some(result) = generated.next() else { break };
            let (trips, failure) = match result {
                Ok(trips) => (trips, None),
                Err(e)    => (Vec::new(), Some(e)),
            };
            let stats = PlatoonStats::from_departures(trips.iter().map(|t| t.platoon));
            let entry = BucketReport {
                bucket:    bucket.id,
                target:    bucket.target,
                emitted:   trips.len(),
                platoons:  stats.sizes.len(),
                platooned: stats.platooned(),
                failure,
            };
            match &entry.failure {
                Some(e) => warn!("{}: emitted 0 of {} trips: {e}", bucket.id, bucket.target),
                None => debug!(
                    "{}: {} trips, {} platoons ({} vehicles)",
                    bucket.id, entry.emitted, entry.platoons, entry.platooned
                ),
            }
            observer.on_bucket_done(&entry);
            report.buckets.push(entry);
            buckets.push(BucketTrips { bucket: *bucket, trips });
        }

        self.set_phase(BuildPhase::Merging, observer);
        check_unique_ids(&buckets)?;
        let merged = self.merge.then(|| merge_sorted(&buckets));
        if let Some(all) = &merged {
            observer.on_merged(all.len());
        }

        if report.is_complete() {
            info!("generated {} trips", report.emitted_total());
        } else {
            warn!(
                "generated {} of {} trips; {} bucket(s) short",
                report.emitted_total(),
                report.target_total(),
                report.shortfalls().count()
            );
        }

        self.set_phase(BuildPhase::Done, observer);
        Ok(TripStream { buckets, merged, report })
    }

    fn set_phase<O: StreamObserver>(&mut self, phase: BuildPhase, observer: &mut O) {
        self.phase = phase;
        observer.on_phase(phase);
    }
}

// ── Bucket generation ─────────────────────────────────────────────────────────

#[cfg(feature = "parallel")]
fn generate_all(ctx: &BucketContext, buckets: &[Bucket]) -> Vec<Result<Vec<TripRecord>, BucketFailure>> {
    buckets.par_iter().map(|b| generate_bucket(ctx, b)).collect()
}

/// Sample, cluster, and assign endpoints for one bucket.
///
/// Uses only the bucket's own RNG, so the result does not depend on which
/// other buckets exist or in what order they run.  An empty bucket needs no
/// endpoints and never fails.
fn generate_bucket(ctx: &BucketContext, bucket: &Bucket) -> Result<Vec<TripRecord>, BucketFailure> {
    if bucket.target == 0 {
        return Ok(Vec::new());
    }
    let direction = bucket.id.direction;
    ctx.assigner.check(direction)?;

    let mut rng = BucketRng::new(ctx.seed, bucket.id);
    let anchors = DepartureSampler::new(&ctx.curve, ctx.budget_factor).sample(bucket.target, &mut rng)?;
    let departures = PlatoonGenerator::new(bucket.platoon, bucket.id.class, ctx.curve.horizon())
        .cluster(&anchors, &mut rng);

    let mut trips = Vec::with_capacity(departures.len());
    for (seq, dep) in departures.into_iter().enumerate() {
        let (origin, destination) = ctx.assigner.assign(direction, &mut rng)?;
        trips.push(TripRecord {
            id: bucket.id.trip(seq as u32),
            origin,
            destination,
            depart: dep.time,
            platoon: dep.platoon,
        });
    }
    Ok(trips)
}

// ── Merging ───────────────────────────────────────────────────────────────────

pub(crate) fn check_unique_ids(buckets: &[BucketTrips]) -> StreamResult<()> {
    let mut seen: FxHashSet<TripId> = FxHashSet::default();
    for trip in buckets.iter().flat_map(|b| &b.trips) {
        if !seen.insert(trip.id) {
            return Err(StreamError::DuplicateTripId(trip.id.to_string()));
        }
    }
    Ok(())
}

/// All trips sorted by departure; ties keep bucket order.
fn merge_sorted(buckets: &[BucketTrips]) -> Vec<TripRecord> {
    let mut all: Vec<TripRecord> = buckets.iter().flat_map(|b| b.trips.iter().cloned()).collect();
    all.sort_by(|a, b| a.depart.total_cmp(&b.depart));
    all
}
