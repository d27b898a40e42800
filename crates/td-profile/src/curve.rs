//! Piecewise-linear demand curve.
//!
//! The curve maps seconds since scenario start to a departure-density
//! multiplier in `[0, 1]`.  Between consecutive control points it is linearly
//! interpolated; before the first point and after the last it holds the end
//! value.  Queries outside `[0, horizon]` are clamped to the horizon first.
//!
//! ```text
//! multiplier
//!   1.0 |        ______________
//!       |      /                \
//!   0.6 |    /                    \
//!   0.4 |                           \
//!       +----+--------+--------+----+-- t (s)
//!       0   900     2700    3600
//! ```

use td_core::{ConfigResult, CurvePoint, DemandConfig, rush_hour_curve, validate_curve};

/// Time-varying multiplier shaping departure density over the horizon.
#[derive(Clone, Debug)]
pub struct DemandCurve {
    points:  Vec<CurvePoint>,
    horizon: f64,
    peak:    f64,
}

impl DemandCurve {
    /// Build a curve from validated control points.
    pub fn new(points: Vec<CurvePoint>, horizon: f64) -> ConfigResult<Self> {
        validate_curve(&points)?;
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(td_core::ConfigError::Horizon(horizon));
        }
        let mut curve = Self { points, horizon, peak: 0.0 };
        let peak = curve.breakpoints().map(|t| curve.multiplier(t)).fold(0.0, f64::max);
        curve.peak = peak;
        Ok(curve)
    }

    /// Curve and horizon taken from a run configuration.
    pub fn from_config(config: &DemandConfig) -> ConfigResult<Self> {
        Self::new(config.demand_curve.clone(), config.horizon_secs)
    }

    /// The default one-hour build-up / peak / taper curve.
    pub fn rush_hour() -> Self {
        let points = rush_hour_curve();
        let peak = points.iter().map(|p| p.multiplier).fold(0.0, f64::max);
        Self { points, horizon: 3_600.0, peak }
    }

    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Largest multiplier anywhere in `[0, horizon]`.
    #[inline]
    pub fn peak(&self) -> f64 {
        self.peak
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Density multiplier at `t` seconds.
    pub fn multiplier(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, self.horizon);
        let first = self.points[0];
        if t <= first.at_secs {
            return first.multiplier;
        }
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            if t <= b.at_secs {
                let frac = (t - a.at_secs) / (b.at_secs - a.at_secs);
                return a.multiplier + frac * (b.multiplier - a.multiplier);
            }
        }
        self.points[self.points.len() - 1].multiplier
    }

    /// Exact integral of the multiplier over `[from, to]` (both clamped to
    /// the horizon).  The curve is linear between breakpoints, so the
    /// trapezoid rule on breakpoints is exact.
    pub fn integral(&self, from: f64, to: f64) -> f64 {
        let a = from.clamp(0.0, self.horizon);
        let b = to.clamp(0.0, self.horizon);
        if b <= a {
            return 0.0;
        }
        let mut knots: Vec<f64> = self.breakpoints().filter(|&t| t > a && t < b).collect();
        knots.insert(0, a);
        knots.push(b);
        knots
            .windows(2)
            .map(|w| 0.5 * (self.multiplier(w[0]) + self.multiplier(w[1])) * (w[1] - w[0]))
            .sum()
    }

    /// Expected share of departures falling in `[from, to]`.
    pub fn share(&self, from: f64, to: f64) -> f64 {
        let total = self.integral(0.0, self.horizon);
        if total <= 0.0 {
            return 0.0;
        }
        self.integral(from, to) / total
    }

    /// `0`, every control point inside the horizon, and the horizon itself.
    fn breakpoints(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(0.0)
            .chain(
                self.points
                    .iter()
                    .map(|p| p.at_secs)
                    .filter(|&t| t > 0.0 && t < self.horizon),
            )
            .chain(std::iter::once(self.horizon))
    }
}
