//! Origin/destination assignment.

use std::collections::BTreeMap;

use td_core::{BucketRng, Direction, EdgeId};

use crate::{BoundaryRegistry, InvalidEndpointError};

/// Valid destinations for each viable origin of one direction.
#[derive(Clone, Debug)]
struct PairTable {
    origins: Vec<EdgeId>,
    /// `exits[i]` are the destinations allowed from `origins[i]`; never empty.
    exits:   Vec<Vec<EdgeId>>,
}

/// Maps a direction to a random valid (origin, destination) pair.
///
/// Pair tables are computed once from the registry: every entry edge keeps
/// the exits that are neither the same edge nor immediately adjacent to it,
/// and entries left with no exits are dropped.  A draw is then an origin
/// uniform over the viable entries followed by a destination uniform over
/// that origin's exits; no rejection loop is needed.
///
/// The same filter applies to every direction, not just
/// [`Direction::Uniform`]: a north-south trip that enters and leaves on the
/// two halves of one boundary road is as useless as a uniform one.
pub struct OdAssigner {
    tables: BTreeMap<Direction, Result<PairTable, InvalidEndpointError>>,
}

impl OdAssigner {
    pub fn new(registry: &BoundaryRegistry) -> Self {
        let tables = Direction::ALL
            .iter()
            .map(|&dir| (dir, Self::table_for(registry, dir)))
            .collect();
        Self { tables }
    }

    fn table_for(registry: &BoundaryRegistry, direction: Direction) -> Result<PairTable, InvalidEndpointError> {
        let sets = registry.edges(direction);
        let entries = sets.map(|s| s.entries.as_slice()).unwrap_or_default();
        let exits = sets.map(|s| s.exits.as_slice()).unwrap_or_default();
        if entries.is_empty() {
            return Err(InvalidEndpointError::NoEdges { direction, role: "entry" });
        }
        if exits.is_empty() {
            return Err(InvalidEndpointError::NoEdges { direction, role: "exit" });
        }

        let mut table = PairTable { origins: Vec::new(), exits: Vec::new() };
        for origin in entries {
            let allowed: Vec<EdgeId> = exits
                .iter()
                .filter(|dest| !registry.is_excluded_pair(origin, dest))
                .cloned()
                .collect();
            if !allowed.is_empty() {
                table.origins.push(origin.clone());
                table.exits.push(allowed);
            }
        }
        if table.origins.is_empty() {
            return Err(InvalidEndpointError::NoValidPairs { direction });
        }
        Ok(table)
    }

    /// `Ok` if `direction` can produce pairs.  Lets a caller fail a bucket
    /// before spending any sampling effort on it.
    pub fn check(&self, direction: Direction) -> Result<(), InvalidEndpointError> {
        match &self.tables[&direction] {
            Ok(_)  => Ok(()),
            Err(e) => Err(e.clone()),
        }
    }

    /// Number of distinct (origin, destination) pairs available.
    pub fn pair_count(&self, direction: Direction) -> usize {
        match &self.tables[&direction] {
            Ok(t)  => t.exits.iter().map(Vec::len).sum(),
            Err(_) => 0,
        }
    }

    /// Draw an (origin, destination) pair with `origin != destination`.
    pub fn assign(
        &self,
        direction: Direction,
        rng:       &mut BucketRng,
    ) -> Result<(EdgeId, EdgeId), InvalidEndpointError> {
        let table = self.tables[&direction].as_ref().map_err(Clone::clone)?;
        let i = rng.gen_range(0..table.origins.len());
        let exits = &table.exits[i];
        let j = rng.gen_range(0..exits.len());
        Ok((table.origins[i].clone(), exits[j].clone()))
    }
}
