//! Strongly typed identifiers for vehicle classes, directions, buckets,
//! boundary edges, and trips.
//!
//! All small identifiers are `Copy + Ord + Hash` so they can be used as
//! `BTreeMap` keys; iteration order over such maps is then the fixed
//! (class, direction) order the stream builder relies on.
//!
//! [`TripId`] owns the naming contract for emitted vehicles: its `Display`
//! impl is the one canonical stringification, and every writer goes through
//! it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ── VehicleClass ──────────────────────────────────────────────────────────────

/// Vehicle classes known to the vehicle-type catalog.
///
/// Declaration order is the bucket generation order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleClass {
    Motorcycle,
    Car,
    Delivery,
    Bus,
    Truck,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 5] = [
        VehicleClass::Motorcycle,
        VehicleClass::Car,
        VehicleClass::Delivery,
        VehicleClass::Bus,
        VehicleClass::Truck,
    ];

    /// The `type` value written to trip files; must match a catalog `vType` id.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Motorcycle => "motorcycle",
            VehicleClass::Car        => "car",
            VehicleClass::Delivery   => "delivery",
            VehicleClass::Bus        => "bus",
            VehicleClass::Truck      => "truck",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Half-width of the departure jitter applied to platoon members, in
    /// seconds.  Two-wheelers release from a stop line almost together;
    /// long vehicles need more headway.
    pub fn platoon_jitter_secs(self) -> f64 {
        match self {
            VehicleClass::Motorcycle => 1.0,
            VehicleClass::Car        => 2.0,
            VehicleClass::Delivery   => 2.5,
            VehicleClass::Bus        => 3.5,
            VehicleClass::Truck      => 3.5,
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Directional split of the fleet.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Westbound,
    Eastbound,
    NorthSouth,
    /// Any boundary edge to any other boundary edge.
    Uniform,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Westbound,
        Direction::Eastbound,
        Direction::NorthSouth,
        Direction::Uniform,
    ];

    /// Label used in config files and the registry CSV.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Westbound  => "westbound",
            Direction::Eastbound  => "eastbound",
            Direction::NorthSouth => "north-south",
            Direction::Uniform    => "uniform",
        }
    }

    /// Short form used in trip ids and file names.  `None` for
    /// [`Direction::Uniform`], whose buckets are named by class alone.
    pub fn abbrev(self) -> Option<&'static str> {
        match self {
            Direction::Westbound  => Some("wb"),
            Direction::Eastbound  => Some("eb"),
            Direction::NorthSouth => Some("ns"),
            Direction::Uniform    => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a config/registry label.  Accepts the short forms too.
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim() {
            "westbound" | "wb"                         => Some(Direction::Westbound),
            "eastbound" | "eb"                         => Some(Direction::Eastbound),
            "north-south" | "north_south" | "ns"       => Some(Direction::NorthSouth),
            "uniform"                                  => Some(Direction::Uniform),
            _                                          => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── BucketId ──────────────────────────────────────────────────────────────────

/// A (class, direction) partition of the fleet.
///
/// Ordering is class-major, matching the generation order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct BucketId {
    pub class:     VehicleClass,
    pub direction: Direction,
}

impl BucketId {
    pub fn new(class: VehicleClass, direction: Direction) -> Self {
        Self { class, direction }
    }

    /// Stable non-zero integer identity, used to derive the bucket's RNG seed.
    /// Independent of which other buckets exist in the run.
    #[inline]
    pub fn key(self) -> u64 {
        (self.class.index() as u64) * 8 + self.direction.index() as u64 + 1
    }

    /// `{class}.{dir}` or `{class}` for uniform buckets.
    pub fn file_stem(self) -> String {
        match self.direction.abbrev() {
            Some(dir) => format!("{}.{}", self.class, dir),
            None      => self.class.to_string(),
        }
    }

    /// Build the id of the `seq`-th trip of this bucket.
    #[inline]
    pub fn trip(self, seq: u32) -> TripId {
        TripId { class: self.class, direction: self.direction, seq }
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.class, self.direction)
    }
}

// ── TripId ────────────────────────────────────────────────────────────────────

/// Structured vehicle identifier.
///
/// `Display` is the canonical stringification written to trip files:
/// `motorcycle_wb_17`, `car_ns_3`, and `truck_0` for uniform buckets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TripId {
    pub class:     VehicleClass,
    pub direction: Direction,
    /// Position of the trip within its bucket, in departure order.
    pub seq:       u32,
}

impl TripId {
    #[inline]
    pub fn bucket(self) -> BucketId {
        BucketId::new(self.class, self.direction)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction.abbrev() {
            Some(dir) => write!(f, "{}_{}_{}", self.class, dir, self.seq),
            None      => write!(f, "{}_{}", self.class, self.seq),
        }
    }
}

// ── EdgeId ────────────────────────────────────────────────────────────────────

/// Name of a boundary edge in the external network file.
///
/// Reference-counted so that copying an edge into thousands of trip records
/// costs a pointer bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EdgeId(Arc<str>);

impl EdgeId {
    pub fn new(name: &str) -> Self {
        EdgeId(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeId {
    fn from(name: &str) -> Self {
        EdgeId::new(name)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
