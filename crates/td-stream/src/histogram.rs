//! Fixed-width departure histogram, the usual check of the demand shape.

use td_core::TripRecord;

/// Default bin width: five minutes.
pub const DEFAULT_BIN_SECS: f64 = 300.0;

/// Departure counts in consecutive bins of `bin_secs` covering `[0, horizon)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DepartureHistogram {
    bin_secs: f64,
    counts:   Vec<usize>,
}

impl DepartureHistogram {
    /// `bin_secs` must be positive; the last bin may be shorter than the rest.
    pub fn new(bin_secs: f64, horizon: f64) -> Self {
        let bins = if bin_secs > 0.0 { (horizon / bin_secs).ceil().max(1.0) as usize } else { 1 };
        Self { bin_secs: bin_secs.max(f64::MIN_POSITIVE), counts: vec![0; bins] }
    }

    pub fn from_trips<'a, I>(trips: I, bin_secs: f64, horizon: f64) -> Self
    where
        I: IntoIterator<Item = &'a TripRecord>,
    {
        let mut h = Self::new(bin_secs, horizon);
        for trip in trips {
            h.record(trip.depart);
        }
        h
    }

    /// Count one departure.  Times past the last bin land in the last bin.
    pub fn record(&mut self, depart: f64) {
        let last = self.counts.len() - 1;
        let i = ((depart.max(0.0) / self.bin_secs) as usize).min(last);
        self.counts[i] += 1;
    }

    pub fn bin_secs(&self) -> f64 {
        self.bin_secs
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(bin_start, bin_end, count)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i, &c)| {
            let start = i as f64 * self.bin_secs;
            (start, start + self.bin_secs, c)
        })
    }

    /// Mean count of the bins that start inside `[from, to)`.
    pub fn mean_count(&self, from: f64, to: f64) -> f64 {
        let selected: Vec<usize> = self
            .bins()
            .filter(|&(start, _, _)| start >= from && start < to)
            .map(|(_, _, c)| c)
            .collect();
        if selected.is_empty() {
            return 0.0;
        }
        selected.iter().sum::<usize>() as f64 / selected.len() as f64
    }

    /// Fraction of all departures in bins starting inside `[from, to)`.
    pub fn share(&self, from: f64, to: f64) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let in_window: usize = self
            .bins()
            .filter(|&(start, _, _)| start >= from && start < to)
            .map(|(_, _, c)| c)
            .sum();
        in_window as f64 / total as f64
    }
}
