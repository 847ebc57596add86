//! Resource vectors and placement descriptors.
//!
//! Both sides of a placement carry the same four dimensions: compute
//! (MIPS), memory, storage and bandwidth. A [`ResourceNode`] exposes them as
//! capacity, a [`WorkloadUnit`] as demand.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Number of resource dimensions tracked per node and unit.
pub const DIMENSIONS: usize = 4;

/// A four-dimensional resource amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Processing capacity or demand (MIPS).
    pub compute: f64,
    /// Memory (MB).
    pub memory: f64,
    /// Storage (MB).
    pub storage: f64,
    /// Network bandwidth (Mbps).
    pub bandwidth: f64,
}

impl Resources {
    /// All dimensions zero.
    pub const ZERO: Resources = Resources {
        compute: 0.0,
        memory: 0.0,
        storage: 0.0,
        bandwidth: 0.0,
    };

    /// Creates a resource vector.
    pub fn new(compute: f64, memory: f64, storage: f64, bandwidth: f64) -> Self {
        Self {
            compute,
            memory,
            storage,
            bandwidth,
        }
    }

    /// Dimensions in fixed order: compute, memory, storage, bandwidth.
    pub fn as_array(&self) -> [f64; DIMENSIONS] {
        [self.compute, self.memory, self.storage, self.bandwidth]
    }

    /// Whether every dimension of `self` is at most the same dimension of `capacity`.
    pub fn fits_within(&self, capacity: &Resources) -> bool {
        self.as_array()
            .iter()
            .zip(capacity.as_array())
            .all(|(&demand, cap)| demand <= cap)
    }

    /// Per-dimension ratio `self / capacity`.
    pub fn ratio_to(&self, capacity: &Resources) -> [f64; DIMENSIONS] {
        let demand = self.as_array();
        let cap = capacity.as_array();
        std::array::from_fn(|d| demand[d] / cap[d])
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(self, rhs: Resources) -> Resources {
        Resources {
            compute: self.compute + rhs.compute,
            memory: self.memory + rhs.memory,
            storage: self.storage + rhs.storage,
            bandwidth: self.bandwidth + rhs.bandwidth,
        }
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        *self = *self + rhs;
    }
}

/// A physical host that workload units are placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Stable node identifier. Also used as a topology position:
    /// nodes with close ids are considered close in the network.
    pub id: u64,
    /// Total capacity per dimension.
    pub capacity: Resources,
}

impl ResourceNode {
    /// Creates a node with the given capacity.
    pub fn new(id: u64, capacity: Resources) -> Self {
        Self { id, capacity }
    }

    /// Creates a node from a processing-element count and per-element MIPS.
    ///
    /// Compute capacity is `pes * mips_per_pe`.
    pub fn with_pes(
        id: u64,
        pes: u32,
        mips_per_pe: f64,
        memory: f64,
        storage: f64,
        bandwidth: f64,
    ) -> Self {
        Self::new(
            id,
            Resources::new(pes as f64 * mips_per_pe, memory, storage, bandwidth),
        )
    }
}

/// A virtual machine to be placed on exactly one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadUnit {
    /// Stable unit identifier.
    pub id: u64,
    /// Demand per dimension.
    pub demand: Resources,
}

impl WorkloadUnit {
    /// Creates a unit with the given demand.
    pub fn new(id: u64, demand: Resources) -> Self {
        Self { id, demand }
    }

    /// Creates a unit from a processing-element count and per-element MIPS.
    pub fn with_pes(
        id: u64,
        pes: u32,
        mips_per_pe: f64,
        memory: f64,
        storage: f64,
        bandwidth: f64,
    ) -> Self {
        Self::new(
            id,
            Resources::new(pes as f64 * mips_per_pe, memory, storage, bandwidth),
        )
    }
}
