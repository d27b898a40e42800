//! Departure-time sampling by rejection against the demand curve.
//!
//! Each draw picks `t` uniformly in `[0, horizon)` and keeps it with
//! probability `multiplier(t) / peak`.  Accepted times are therefore
//! distributed proportionally to the curve.  The number of draws is bounded
//! by `requested * budget_factor`; running out is reported as
//! [`GenerationError::BudgetExhausted`] rather than returning fewer times.

use log::debug;

use td_core::BucketRng;

use crate::{DemandCurve, GenerationError, GenerationResult};

/// Draws departure anchors shaped by a [`DemandCurve`].
pub struct DepartureSampler<'a> {
    curve:         &'a DemandCurve,
    budget_factor: u32,
}

impl<'a> DepartureSampler<'a> {
    pub fn new(curve: &'a DemandCurve, budget_factor: u32) -> Self {
        Self { curve, budget_factor }
    }

    /// Maximum number of draws allowed for `requested` departures.
    #[inline]
    pub fn budget(&self, requested: usize) -> u64 {
        (requested as u64).saturating_mul(self.budget_factor as u64)
    }

    /// Sample exactly `requested` departure times, sorted ascending.
    ///
    /// A curve that is zero everywhere can never accept a draw and fails
    /// immediately without spending the budget.
    pub fn sample(&self, requested: usize, rng: &mut BucketRng) -> GenerationResult<Vec<f64>> {
        if requested == 0 {
            return Ok(Vec::new());
        }
        let peak = self.curve.peak();
        if peak <= 0.0 {
            return Err(GenerationError::BudgetExhausted { requested, accepted: 0, attempts: 0 });
        }

        let horizon = self.curve.horizon();
        let budget = self.budget(requested);
        let mut times = Vec::with_capacity(requested);
        let mut attempts: u64 = 0;

        while times.len() < requested {
            if attempts >= budget {
                return Err(GenerationError::BudgetExhausted {
                    requested,
                    accepted: times.len(),
                    attempts,
                });
            }
            attempts += 1;
            let t = rng.gen_range(0.0..horizon);
            if rng.unit() * peak < self.curve.multiplier(t) {
                times.push(t);
            }
        }

        debug!("sampled {requested} departures in {attempts} draws");
        times.sort_by(f64::total_cmp);
        Ok(times)
    }
}
