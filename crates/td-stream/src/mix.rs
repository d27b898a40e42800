//! Fleet partitioning into (class, direction) buckets.
//!
//! Percentages rarely divide the fleet evenly, so counts are apportioned
//! with the largest-remainder method: every share gets the floor of its
//! exact quota, and the leftover vehicles go to the shares with the largest
//! fractional parts (ties to the earlier share).  The result sums exactly to
//! the total and no share deviates from its quota by one vehicle or more.
//!
//! Apportionment runs twice: the fleet across classes, then each class
//! across its directions.

use std::collections::BTreeMap;

use td_core::{BucketId, DemandConfig, Direction, PlatoonParams, VehicleClass};

/// One generation unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bucket {
    pub id:      BucketId,
    /// Trips to emit, `>= 0`.
    pub target:  usize,
    pub platoon: PlatoonParams,
}

/// Split `total` proportionally to `weights`.
///
/// Returns all zeros if the weights sum to zero.
pub fn apportion(total: usize, weights: &[f64]) -> Vec<usize> {
    let sum: f64 = weights.iter().sum();
    if weights.is_empty() || sum <= 0.0 {
        return vec![0; weights.len()];
    }

    let quotas: Vec<f64> = weights.iter().map(|w| total as f64 * w / sum).collect();
    let mut counts: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();
    let leftover = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = quotas[a] - quotas[a].floor();
        let fb = quotas[b] - quotas[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    for &i in order.iter().take(leftover) {
        counts[i] += 1;
    }
    counts
}

/// Target counts per (class, direction) bucket.
#[derive(Clone, Debug)]
pub struct VehicleClassMix {
    buckets: Vec<Bucket>,
}

impl VehicleClassMix {
    /// Apportion `config.total_vehicles`.  Expects a validated config.
    pub fn from_config(config: &DemandConfig) -> Self {
        let classes: Vec<VehicleClass> = config.classes.keys().copied().collect();
        let shares: Vec<f64> = config.classes.values().map(|c| c.share_pct).collect();
        let class_counts = apportion(config.total_vehicles, &shares);

        let mut buckets = Vec::new();
        for (class, class_count) in classes.into_iter().zip(class_counts) {
            let cfg = &config.classes[&class];
            if cfg.share_pct <= 0.0 {
                continue;
            }
            let dirs: Vec<Direction> = cfg.directions.keys().copied().collect();
            let dir_shares: Vec<f64> = cfg.directions.values().copied().collect();
            let platoon = config.platoon_for(class);
            for (direction, target) in dirs.into_iter().zip(apportion(class_count, &dir_shares)) {
                buckets.push(Bucket { id: BucketId::new(class, direction), target, platoon });
            }
        }

        Self { buckets }
    }

    /// Buckets in generation order (class-major, then direction).
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.target).sum()
    }

    pub fn target(&self, id: BucketId) -> Option<usize> {
        self.buckets.iter().find(|b| b.id == id).map(|b| b.target)
    }

    pub fn class_totals(&self) -> BTreeMap<VehicleClass, usize> {
        let mut out = BTreeMap::new();
        for b in &self.buckets {
            *out.entry(b.id.class).or_default() += b.target;
        }
        out
    }

    pub fn direction_totals(&self) -> BTreeMap<Direction, usize> {
        let mut out = BTreeMap::new();
        for b in &self.buckets {
            *out.entry(b.id.direction).or_default() += b.target;
        }
        out
    }
}
