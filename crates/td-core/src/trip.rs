//! The trip record emitted for every generated vehicle.

use crate::{EdgeId, TripId, VehicleClass};

/// Number of decimals departure times are written with.
pub const DEPART_DECIMALS: usize = 2;

const DEPART_SCALE: f64 = 100.0;

/// Truncate a departure time to the written precision.
///
/// Truncation rather than rounding keeps any `t < horizon` strictly below
/// the horizon after formatting.
#[inline]
pub fn quantize_depart(t: f64) -> f64 {
    (t * DEPART_SCALE).floor() / DEPART_SCALE
}

/// Quantize `t` and clamp it into `[0, horizon)` at the written precision.
pub fn clamp_depart(t: f64, horizon: f64) -> f64 {
    let mut last = quantize_depart(horizon);
    if last >= horizon {
        last -= 1.0 / DEPART_SCALE;
    }
    quantize_depart(t).clamp(0.0, last.max(0.0))
}

/// One vehicle departure.
#[derive(Clone, Debug, PartialEq)]
pub struct TripRecord {
    pub id:          TripId,
    pub origin:      EdgeId,
    pub destination: EdgeId,
    /// Seconds from scenario start, in `[0, horizon)`, already quantized.
    pub depart:      f64,
    /// Index of the platoon within its bucket, `None` for lone vehicles.
    pub platoon:     Option<u32>,
}

impl TripRecord {
    #[inline]
    pub fn class(&self) -> VehicleClass {
        self.id.class
    }

    /// Departure formatted at the fixed output precision.
    pub fn depart_str(&self) -> String {
        format!("{:.*}", DEPART_DECIMALS, self.depart)
    }
}
