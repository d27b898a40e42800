//! Platoon clustering of sampled departure anchors.
//!
//! Anchors are walked in time order.  At each anchor a platoon starts with
//! probability `q`; a platoon of size `k ∈ [min, max]` consumes the next `k`
//! anchors and places all `k` members around the first one, each offset by a
//! uniform jitter in `±jitter_secs`.  Otherwise the anchor becomes a lone
//! departure.  Fewer than `min` remaining anchors are always emitted alone.
//!
//! `q` is derived from the configured record fraction `p` so that, in
//! expectation, a fraction `p` of the vehicles end up in a platoon:
//!
//! ```text
//! p = q·E[k] / (q·E[k] + (1 − q))   ⇒   q = p / (E[k]·(1 − p) + p)
//! ```
//!
//! Only the platoon anchor follows the demand curve; members scatter around
//! it.  The anchors a platoon consumes are adjacent in time, so the shape of
//! the histogram is preserved at bin widths well above the jitter.

use std::collections::BTreeMap;

use td_core::{BucketRng, PlatoonParams, VehicleClass, clamp_depart};

/// One departure after clustering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Departure {
    /// Quantized seconds in `[0, horizon)`.
    pub time:    f64,
    /// Platoon index within the bucket, `None` for lone vehicles.
    pub platoon: Option<u32>,
}

/// Groups departure anchors into lone vehicles and platoons.
pub struct PlatoonGenerator {
    params:      PlatoonParams,
    jitter_secs: f64,
    horizon:     f64,
}

impl PlatoonGenerator {
    /// Use the class's jitter from [`VehicleClass::platoon_jitter_secs`].
    pub fn new(params: PlatoonParams, class: VehicleClass, horizon: f64) -> Self {
        Self::with_jitter(params, class.platoon_jitter_secs(), horizon)
    }

    pub fn with_jitter(params: PlatoonParams, jitter_secs: f64, horizon: f64) -> Self {
        Self { params, jitter_secs: jitter_secs.max(0.0), horizon }
    }

    /// Per-anchor probability of starting a platoon.
    pub fn group_start_probability(&self) -> f64 {
        let p = self.params.probability;
        if p <= 0.0 {
            return 0.0;
        }
        let mean = self.params.mean_size();
        (p / (mean * (1.0 - p) + p)).clamp(0.0, 1.0)
    }

    /// Cluster `anchors` (sorted ascending) into exactly `anchors.len()`
    /// departures, returned sorted ascending by time.
    pub fn cluster(&self, anchors: &[f64], rng: &mut BucketRng) -> Vec<Departure> {
        let n = anchors.len();
        let min = self.params.min_size as usize;
        let q = self.group_start_probability();

        let mut out = Vec::with_capacity(n);
        let mut next_platoon: u32 = 0;
        let mut i = 0;

        while i < n {
            let remaining = n - i;
            if remaining >= min && q > 0.0 && rng.gen_bool(q) {
                let k = rng.gen_range(self.params.min_size..=self.params.max_size) as usize;
                let k = k.min(remaining);
                let anchor = anchors[i];
                for _ in 0..k {
                    let offset = rng.gen_range(-self.jitter_secs..=self.jitter_secs);
                    out.push(Departure {
                        time:    clamp_depart(anchor + offset, self.horizon),
                        platoon: Some(next_platoon),
                    });
                }
                next_platoon += 1;
                i += k;
            } else {
                out.push(Departure {
                    time:    clamp_depart(anchors[i], self.horizon),
                    platoon: None,
                });
                i += 1;
            }
        }

        // Stable: members of a platoon that clamp to the same instant keep
        // their generation order.
        out.sort_by(|a, b| a.time.total_cmp(&b.time));
        out
    }
}

/// Summary of the platoon structure of a departure set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatoonStats {
    /// Size of every platoon, keyed by platoon index.
    pub sizes:    BTreeMap<u32, usize>,
    /// Vehicles departing alone.
    pub singles:  usize,
}

impl PlatoonStats {
    pub fn from_departures<I>(platoons: I) -> Self
    where
        I: IntoIterator<Item = Option<u32>>,
    {
        let mut stats = PlatoonStats::default();
        for p in platoons {
            match p {
                Some(id) => *stats.sizes.entry(id).or_default() += 1,
                None     => stats.singles += 1,
            }
        }
        stats
    }

    pub fn platooned(&self) -> usize {
        self.sizes.values().sum()
    }

    /// Fraction of vehicles that travel in a platoon.
    pub fn platoon_fraction(&self) -> f64 {
        let total = self.platooned() + self.singles;
        if total == 0 {
            return 0.0;
        }
        self.platooned() as f64 / total as f64
    }
}
