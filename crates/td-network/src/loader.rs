//! CSV registry loader.
//!
//! # CSV format
//!
//! One row per boundary edge.  `role` is `entry` or `exit`; `direction` is a
//! direction label (`westbound`, `eastbound`, `north-south`, `uniform`) or
//! its short form (`wb`, `eb`, `ns`).
//!
//! ```csv
//! direction,role,edge
//! westbound,entry,N_out_6_to_J6
//! westbound,exit,J4_to_N_out_4
//! eastbound,entry,N_out_4_to_J4
//! eastbound,exit,J6_to_N_out_6
//! ```
//!
//! Adjacent pairs are inferred from `A_to_B` / `B_to_A` edge names.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use td_core::Direction;

use crate::{BoundaryRegistry, NetworkError, NetworkResult};

#[derive(Deserialize)]
struct RegistryRecord {
    direction: String,
    role:      String,
    edge:      String,
}

/// Load a [`BoundaryRegistry`] from a CSV file.
pub fn load_registry_csv(path: &Path) -> NetworkResult<BoundaryRegistry> {
    let file = std::fs::File::open(path)?;
    load_registry_reader(file)
}

/// Like [`load_registry_csv`] but accepts any `Read` source.
pub fn load_registry_reader<R: Read>(reader: R) -> NetworkResult<BoundaryRegistry> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = BoundaryRegistry::builder().infer_reverse_pairs();

    for (line, result) in csv_reader.deserialize::<RegistryRecord>().enumerate() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let direction = Direction::parse(&row.direction).ok_or_else(|| {
            NetworkError::Parse(format!("row {}: unknown direction {:?}", line + 1, row.direction))
        })?;
        let edge = row.edge.trim();
        if edge.is_empty() {
            return Err(NetworkError::Parse(format!("row {}: empty edge name", line + 1)));
        }
        builder = match row.role.trim() {
            "entry" => builder.entry(direction, edge),
            "exit"  => builder.exit(direction, edge),
            other   => {
                return Err(NetworkError::Parse(format!(
                    "row {}: invalid role {other:?}: expected \"entry\" or \"exit\"",
                    line + 1
                )));
            }
        };
    }

    Ok(builder.build())
}
