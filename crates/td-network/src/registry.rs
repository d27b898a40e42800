//! Boundary-edge registry.
//!
//! The network itself is external; all the generator needs from it is which
//! fringe edges vehicles may enter on and leave by, grouped per
//! [`Direction`].  The registry also remembers which (entry, exit) pairs are
//! *immediately adjacent*, i.e. the two halves of the same boundary road.  A
//! trip between them would be a U-turn at the fringe, which the route
//! assignment tool repairs or drops, so the assigner never produces one.
//!
//! # Uniform direction
//!
//! If [`Direction::Uniform`] is not registered explicitly it is derived as
//! the union of every other direction's entries and exits, in registration
//! order with duplicates removed.

use std::collections::{BTreeMap, BTreeSet};

use td_core::{Direction, EdgeId};

/// Entry and exit edges for one direction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSets {
    pub entries: Vec<EdgeId>,
    pub exits:   Vec<EdgeId>,
}

impl EdgeSets {
    fn push_unique(list: &mut Vec<EdgeId>, edge: EdgeId) {
        if !list.contains(&edge) {
            list.push(edge);
        }
    }
}

// ── BoundaryRegistry ──────────────────────────────────────────────────────────

/// Direction → boundary edges, plus the adjacency filter.
///
/// Do not construct directly; use [`BoundaryRegistry::builder`].
#[derive(Clone, Debug)]
pub struct BoundaryRegistry {
    sets:     BTreeMap<Direction, EdgeSets>,
    adjacent: BTreeSet<(EdgeId, EdgeId)>,
}

impl BoundaryRegistry {
    pub fn builder() -> BoundaryRegistryBuilder {
        BoundaryRegistryBuilder::new()
    }

    /// Edges registered for `direction`, `None` if the direction is unknown.
    pub fn edges(&self, direction: Direction) -> Option<&EdgeSets> {
        self.sets.get(&direction)
    }

    /// Directions with at least one registered edge.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.sets.keys().copied()
    }

    /// `true` if a trip `from → to` would start and end on the same edge or
    /// on two immediately adjacent edges.
    pub fn is_excluded_pair(&self, from: &EdgeId, to: &EdgeId) -> bool {
        from == to
            || self.adjacent.contains(&(from.clone(), to.clone()))
            || self.adjacent.contains(&(to.clone(), from.clone()))
    }

    pub fn adjacent_pairs(&self) -> usize {
        self.adjacent.len()
    }

    /// Fringe edges of the 3x3 signalised grid scenario.
    ///
    /// Compass groups name the side of the grid an edge sits on.  Westbound
    /// traffic enters on the east side and leaves on the west side, and so
    /// on; north-south traffic uses both the north and the south side.
    pub fn grid_3x3() -> Self {
        const ENTRY_EAST:  [&str; 3] = ["N_out_6_to_J6", "N_out_3e_to_J3", "N_out_9s_to_J9"];
        const ENTRY_WEST:  [&str; 3] = ["N_out_4_to_J4", "N_out_1w_to_J1", "N_out_7s_to_J7"];
        const ENTRY_NORTH: [&str; 3] = ["N_out_1_to_J1", "N_out_2_to_J2", "N_out_3_to_J3"];
        const ENTRY_SOUTH: [&str; 3] = ["N_out_7_to_J7", "N_out_8_to_J8", "N_out_9_to_J9"];

        const EXIT_EAST:  [&str; 4] = ["J6_to_N_out_6", "J3_to_N_out_3e", "J9_to_N_out_9s", "J9_to_N_out_9"];
        const EXIT_WEST:  [&str; 4] = ["J4_to_N_out_4", "J1_to_N_out_1w", "J7_to_N_out_7s", "J7_to_N_out_7"];
        const EXIT_NORTH: [&str; 3] = ["J1_to_N_out_1", "J2_to_N_out_2", "J3_to_N_out_3"];
        const EXIT_SOUTH: [&str; 3] = ["J7_to_N_out_7", "J8_to_N_out_8", "J9_to_N_out_9"];

        BoundaryRegistry::builder()
            .entries(Direction::Westbound, &ENTRY_EAST)
            .exits(Direction::Westbound, &EXIT_WEST)
            .entries(Direction::Eastbound, &ENTRY_WEST)
            .exits(Direction::Eastbound, &EXIT_EAST)
            .entries(Direction::NorthSouth, &ENTRY_NORTH)
            .entries(Direction::NorthSouth, &ENTRY_SOUTH)
            .exits(Direction::NorthSouth, &EXIT_NORTH)
            .exits(Direction::NorthSouth, &EXIT_SOUTH)
            .infer_reverse_pairs()
            .build()
    }
}

// ── BoundaryRegistryBuilder ───────────────────────────────────────────────────

/// Construct a [`BoundaryRegistry`] incrementally, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use td_core::{Direction, EdgeId};
/// use td_network::BoundaryRegistry;
///
/// let reg = BoundaryRegistry::builder()
///     .entries(Direction::Westbound, &["E_in"])
///     .exits(Direction::Westbound, &["W_out"])
///     .build();
/// assert_eq!(reg.edges(Direction::Uniform).unwrap().entries, vec![EdgeId::new("E_in")]);
/// ```
#[derive(Default)]
pub struct BoundaryRegistryBuilder {
    sets:          BTreeMap<Direction, EdgeSets>,
    adjacent:      BTreeSet<(EdgeId, EdgeId)>,
    infer_reverse: bool,
}

impl BoundaryRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, direction: Direction, edge: &str) -> Self {
        let set = self.sets.entry(direction).or_default();
        EdgeSets::push_unique(&mut set.entries, EdgeId::new(edge));
        self
    }

    pub fn exit(mut self, direction: Direction, edge: &str) -> Self {
        let set = self.sets.entry(direction).or_default();
        EdgeSets::push_unique(&mut set.exits, EdgeId::new(edge));
        self
    }

    pub fn entries(self, direction: Direction, edges: &[&str]) -> Self {
        edges.iter().fold(self, |b, e| b.entry(direction, e))
    }

    pub fn exits(self, direction: Direction, edges: &[&str]) -> Self {
        edges.iter().fold(self, |b, e| b.exit(direction, e))
    }

    /// Declare `a` and `b` immediately adjacent (order does not matter).
    pub fn adjacent(mut self, a: &str, b: &str) -> Self {
        self.adjacent.insert((EdgeId::new(a), EdgeId::new(b)));
        self
    }

    /// Treat every entry `X_to_Y` and exit `Y_to_X` as adjacent.
    pub fn infer_reverse_pairs(mut self) -> Self {
        self.infer_reverse = true;
        self
    }

    pub fn build(mut self) -> BoundaryRegistry {
        if !self.sets.contains_key(&Direction::Uniform) {
            let mut all = EdgeSets::default();
            for set in self.sets.values() {
                for e in &set.entries {
                    EdgeSets::push_unique(&mut all.entries, e.clone());
                }
                for e in &set.exits {
                    EdgeSets::push_unique(&mut all.exits, e.clone());
                }
            }
            if !all.entries.is_empty() || !all.exits.is_empty() {
                self.sets.insert(Direction::Uniform, all);
            }
        }

        if self.infer_reverse {
            let exits: BTreeSet<&EdgeId> = self.sets.values().flat_map(|s| &s.exits).collect();
            let mut found = Vec::new();
            for entry in self.sets.values().flat_map(|s| &s.entries) {
                let Some(reversed) = reverse_name(entry.as_str()) else { continue };
                if let Some(exit) = exits.iter().find(|x| x.as_str() == reversed) {
                    found.push((entry.clone(), (*exit).clone()));
                }
            }
            self.adjacent.extend(found);
        }

        BoundaryRegistry { sets: self.sets, adjacent: self.adjacent }
    }
}

/// `"A_to_B"` → `"B_to_A"`.
fn reverse_name(edge: &str) -> Option<String> {
    let (from, to) = edge.split_once("_to_")?;
    Some(format!("{to}_to_{from}"))
}
