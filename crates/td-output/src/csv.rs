//! CSV analysis backend.
//!
//! Creates two files in the configured output directory:
//! - `trips.csv`, one row per trip
//! - `departure_histogram.csv`, five-minute departure counts, written on
//!   [`finish`](TripWriter::finish)

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use td_core::{BucketId, TripRecord};
use td_stream::{DEFAULT_BIN_SECS, DepartureHistogram};

use crate::OutputResult;
use crate::writer::TripWriter;

pub const TRIPS_CSV: &str = "trips.csv";
pub const HISTOGRAM_CSV: &str = "departure_histogram.csv";

/// Writes trip rows and a departure histogram for offline inspection.
pub struct CsvTripWriter {
    trips:     Writer<File>,
    histogram: DepartureHistogram,
    dir:       PathBuf,
    finished:  bool,
}

impl CsvTripWriter {
    /// Open `trips.csv` in `dir` and write its header row.
    pub fn new(dir: &Path, horizon_secs: f64) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let mut trips = Writer::from_path(dir.join(TRIPS_CSV))?;
        trips.write_record(["id", "class", "direction", "origin", "destination", "depart", "platoon"])?;

        Ok(Self {
            trips,
            histogram: DepartureHistogram::new(DEFAULT_BIN_SECS, horizon_secs),
            dir: dir.to_path_buf(),
            finished: false,
        })
    }
}

impl TripWriter for CsvTripWriter {
    fn write_bucket(&mut self, _bucket: BucketId, trips: &[TripRecord]) -> OutputResult<()> {
        for trip in trips {
            self.trips.write_record(&[
                trip.id.to_string(),
                trip.class().to_string(),
                trip.id.direction.to_string(),
                trip.origin.to_string(),
                trip.destination.to_string(),
                trip.depart_str(),
                trip.platoon.map(|p| p.to_string()).unwrap_or_default(),
            ])?;
            self.histogram.record(trip.depart);
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trips.flush()?;

        let mut hist = Writer::from_path(self.dir.join(HISTOGRAM_CSV))?;
        hist.write_record(["bin_start_secs", "bin_end_secs", "departures"])?;
        for (start, end, count) in self.histogram.bins() {
            hist.write_record(&[start.to_string(), end.to_string(), count.to_string()])?;
        }
        hist.flush()?;
        Ok(())
    }
}
