//! Run configuration.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "seed": 42,
//!   "horizon_secs": 3600,
//!   "total_vehicles": 4158,
//!   "classes": {
//!     "motorcycle": {
//!       "share_pct": 81.77,
//!       "directions": { "westbound": 58.8235, "eastbound": 23.5294, "north-south": 17.6471 },
//!       "platoon": { "probability": 0.6, "min_size": 2, "max_size": 6 }
//!     },
//!     "truck": { "share_pct": 0.19, "directions": { "uniform": 100 } }
//!   },
//!   "demand_curve": [
//!     { "at_secs": 0,    "multiplier": 0.6 },
//!     { "at_secs": 900,  "multiplier": 1.0 },
//!     { "at_secs": 2700, "multiplier": 1.0 },
//!     { "at_secs": 3600, "multiplier": 0.4 }
//!   ]
//! }
//! ```
//!
//! `platoon`, `demand_curve`, and `attempt_budget_factor` are optional; the
//! defaults are the per-class table in [`PlatoonParams::for_class`], the
//! three-phase rush-hour curve, and 100 draws per requested departure.
//!
//! Shares are percentages.  Class shares must sum to 100, and so must each
//! class's direction shares, within [`SHARE_TOLERANCE_PCT`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, Direction, VehicleClass};

/// Accepted deviation from 100% for share sums.
pub const SHARE_TOLERANCE_PCT: f64 = 0.5;

/// Default number of rejection-sampling draws allowed per requested departure.
pub const DEFAULT_ATTEMPT_BUDGET_FACTOR: u32 = 100;

// ── Curve control points ──────────────────────────────────────────────────────

/// One control point of the piecewise-linear demand curve.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub at_secs:    f64,
    pub multiplier: f64,
}

impl CurvePoint {
    pub const fn new(at_secs: f64, multiplier: f64) -> Self {
        Self { at_secs, multiplier }
    }
}

/// Build-up 0.6 → 1.0 over the first 15 minutes, flat peak until minute 45,
/// taper 1.0 → 0.4 over the last 15 minutes.
pub fn rush_hour_curve() -> Vec<CurvePoint> {
    vec![
        CurvePoint::new(0.0, 0.6),
        CurvePoint::new(900.0, 1.0),
        CurvePoint::new(2_700.0, 1.0),
        CurvePoint::new(3_600.0, 0.4),
    ]
}

/// Check that `points` describe a usable curve: at least two points, strictly
/// increasing finite times, multipliers in `[0, 1]`.
pub fn validate_curve(points: &[CurvePoint]) -> ConfigResult<()> {
    if points.len() < 2 {
        return Err(ConfigError::Curve(format!(
            "need at least 2 control points, got {}",
            points.len()
        )));
    }
    for p in points {
        if !p.at_secs.is_finite() || !(0.0..=1.0).contains(&p.multiplier) {
            return Err(ConfigError::Curve(format!(
                "control point ({}, {}) out of range",
                p.at_secs, p.multiplier
            )));
        }
    }
    for w in points.windows(2) {
        if w[1].at_secs <= w[0].at_secs {
            return Err(ConfigError::Curve(format!(
                "control point times must increase strictly ({} then {})",
                w[0].at_secs, w[1].at_secs
            )));
        }
    }
    Ok(())
}

// ── Platoon parameters ────────────────────────────────────────────────────────

/// Platooning behaviour for one bucket.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatoonParams {
    /// Target fraction of the bucket's vehicles that travel in a platoon.
    pub probability: f64,
    /// Smallest platoon, at least 2.
    pub min_size:    u32,
    /// Largest platoon, inclusive.
    pub max_size:    u32,
}

impl PlatoonParams {
    /// No platooning at all.
    pub const NONE: PlatoonParams = PlatoonParams { probability: 0.0, min_size: 2, max_size: 2 };

    /// Defaults per class: motorcycles ride in large loose groups, cars in
    /// pairs and triples, commercial vehicles mostly alone.
    pub fn for_class(class: VehicleClass) -> Self {
        match class {
            VehicleClass::Motorcycle => PlatoonParams { probability: 0.6,  min_size: 2, max_size: 6 },
            VehicleClass::Car        => PlatoonParams { probability: 0.5,  min_size: 2, max_size: 4 },
            VehicleClass::Delivery
            | VehicleClass::Bus
            | VehicleClass::Truck    => PlatoonParams { probability: 0.25, min_size: 2, max_size: 3 },
        }
    }

    /// Mean platoon size, assuming sizes uniform over `[min_size, max_size]`.
    #[inline]
    pub fn mean_size(&self) -> f64 {
        (self.min_size + self.max_size) as f64 / 2.0
    }

    pub fn validate(&self, class: VehicleClass) -> ConfigResult<()> {
        let err = |reason: String| Err(ConfigError::Platoon { class, reason });
        if !(0.0..=1.0).contains(&self.probability) {
            return err(format!("probability {} outside [0, 1]", self.probability));
        }
        if self.min_size < 2 {
            return err(format!("min_size {} below 2", self.min_size));
        }
        if self.min_size > self.max_size {
            return err(format!("min_size {} exceeds max_size {}", self.min_size, self.max_size));
        }
        Ok(())
    }
}

// ── Class configuration ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassConfig {
    /// Percentage of the whole fleet.
    pub share_pct:  f64,
    /// Percentage of this class per direction.
    pub directions: BTreeMap<Direction, f64>,
    /// Overrides [`PlatoonParams::for_class`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platoon:    Option<PlatoonParams>,
}

// ── DemandConfig ──────────────────────────────────────────────────────────────

/// Top-level generation configuration.
///
/// Everything a run produces is a function of this value and the boundary
/// registry; the same config always yields byte-identical files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Master RNG seed.
    pub seed:           u64,

    /// Departures fall in `[0, horizon_secs)`.
    pub horizon_secs:   f64,

    /// Fleet size across all buckets.
    pub total_vehicles: usize,

    pub classes:        BTreeMap<VehicleClass, ClassConfig>,

    #[serde(default = "rush_hour_curve")]
    pub demand_curve:   Vec<CurvePoint>,

    /// Rejection-sampling draws allowed per requested departure.
    #[serde(default = "default_budget_factor")]
    pub attempt_budget_factor: u32,
}

fn default_budget_factor() -> u32 {
    DEFAULT_ATTEMPT_BUDGET_FACTOR
}

impl DemandConfig {
    /// The built-in one-hour rush-hour scenario: 4,158 vehicles, heavy
    /// westbound motorcycle flow, commercial vehicles spread uniformly.
    pub fn rush_hour() -> Self {
        use Direction::*;
        use VehicleClass::*;

        let class = |share_pct: f64, dirs: &[(Direction, f64)]| ClassConfig {
            share_pct,
            directions: dirs.iter().copied().collect(),
            platoon: None,
        };

        let mut classes = BTreeMap::new();
        classes.insert(Motorcycle, class(81.77, &[(Westbound, 58.8235), (Eastbound, 23.5294), (NorthSouth, 17.6471)]));
        classes.insert(Car,        class(13.71, &[(Westbound, 52.6316), (Eastbound, 26.3158), (NorthSouth, 21.0526)]));
        classes.insert(Delivery,   class(2.40,  &[(Uniform, 100.0)]));
        classes.insert(Bus,        class(1.92,  &[(Uniform, 100.0)]));
        classes.insert(Truck,      class(0.19,  &[(Uniform, 100.0)]));

        DemandConfig {
            seed: 42,
            horizon_secs: 3_600.0,
            total_vehicles: 4_158,
            classes,
            demand_curve: rush_hour_curve(),
            attempt_budget_factor: DEFAULT_ATTEMPT_BUDGET_FACTOR,
        }
    }

    /// Load and validate a config from a JSON file.
    pub fn load_json(path: &Path) -> ConfigResult<Self> {
        let file = std::fs::File::open(path)?;
        let config: DemandConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        let config: DemandConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Effective platoon parameters for `class`.
    pub fn platoon_for(&self, class: VehicleClass) -> PlatoonParams {
        self.classes
            .get(&class)
            .and_then(|c| c.platoon)
            .unwrap_or_else(|| PlatoonParams::for_class(class))
    }

    /// Check every invariant the generator relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.horizon_secs.is_finite() || self.horizon_secs <= 0.0 {
            return Err(ConfigError::Horizon(self.horizon_secs));
        }
        if self.attempt_budget_factor == 0 {
            return Err(ConfigError::AttemptBudget);
        }
        validate_curve(&self.demand_curve)?;

        let mut class_sum = 0.0;
        for (&class, cfg) in &self.classes {
            check_share(class.as_str().to_string(), cfg.share_pct)?;
            class_sum += cfg.share_pct;

            if cfg.share_pct > 0.0 {
                if cfg.directions.is_empty() {
                    return Err(ConfigError::NoDirections { class });
                }
                let mut dir_sum = 0.0;
                for (&dir, &pct) in &cfg.directions {
                    check_share(format!("{class}/{dir}"), pct)?;
                    dir_sum += pct;
                }
                if (dir_sum - 100.0).abs() > SHARE_TOLERANCE_PCT {
                    return Err(ConfigError::DirectionShareSum { class, sum: dir_sum });
                }
            }

            self.platoon_for(class).validate(class)?;
        }
        if (class_sum - 100.0).abs() > SHARE_TOLERANCE_PCT {
            return Err(ConfigError::ClassShareSum { sum: class_sum });
        }
        Ok(())
    }
}

fn check_share(what: String, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidShare { what, value });
    }
    Ok(())
}
