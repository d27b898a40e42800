//! `td-output`: writing generated trips to disk.
//!
//! # Backends
//!
//! | Backend          | Files                                              |
//! |------------------|----------------------------------------------------|
//! | `SumoTripWriter` | `vtypes.add.xml`, per-bucket and merged trip files |
//! | `CsvTripWriter`  | `trips.csv`, `departure_histogram.csv`             |
//!
//! Both implement [`TripWriter`]; [`write_stream`] drives either from a
//! [`TripStream`][td_stream::TripStream].  File names depend only on the
//! prefix and bucket ids, so reruns overwrite the same set of files.

pub mod csv;
pub mod error;
pub mod sumo;
pub mod vtypes;
pub mod writer;


pub use self::csv::{CsvTripWriter, HISTOGRAM_CSV, TRIPS_CSV};
pub use error::{OutputError, OutputResult};
pub use sumo::{
    SumoTripWriter, TripArtifact, TripFile, bucket_file_name, merged_file_name, write_trips_file,
};
pub use vtypes::{VTYPES_FILE, VehicleType, write_vtypes};
pub use writer::{TripWriter, write_stream};
