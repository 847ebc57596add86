//! Allocation genome: one candidate placement of every unit.
//!
//! # Encoding
//!
//! The chromosome is a fixed-size vector indexed by unit position (the
//! unit's index in the descriptor slice). Each gene holds the position of
//! the node the unit runs on. A per-node occupant count is kept next to it
//! so the active-node set never has to be recomputed and can never go stale.

use std::collections::BTreeMap;

use rand::Rng;

use crate::models::{ResourceNode, Resources, WorkloadUnit};

/// A candidate placement.
///
/// Lower fitness = better placement (minimization convention). An
/// unevaluated solution carries `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSolution {
    /// Node position per unit position.
    genes: Vec<Option<usize>>,
    /// Number of units on each node position.
    occupancy: Vec<usize>,
    /// Number of nodes with a non-zero occupancy.
    active_count: usize,
    /// Fitness value (lower = better).
    fitness: f64,
}

impl AllocationSolution {
    /// Creates a solution with no unit assigned yet.
    pub fn unassigned(unit_count: usize, node_count: usize) -> Self {
        Self {
            genes: vec![None; unit_count],
            occupancy: vec![0; node_count],
            active_count: 0,
            fitness: f64::INFINITY,
        }
    }

    /// Creates a random solution: each unit independently on a uniform node.
    ///
    /// With no nodes every unit stays unassigned.
    pub fn random<R: Rng>(unit_count: usize, node_count: usize, rng: &mut R) -> Self {
        let mut solution = Self::unassigned(unit_count, node_count);
        if node_count == 0 {
            return solution;
        }
        for unit in 0..unit_count {
            let node = rng.random_range(0..node_count);
            solution.reallocate(unit, node);
        }
        solution
    }

    /// Creates a solution from explicit node positions, one per unit.
    ///
    /// # Panics
    /// Panics if any position is `>= node_count`.
    pub fn from_assignment(assignment: &[usize], node_count: usize) -> Self {
        let mut solution = Self::unassigned(assignment.len(), node_count);
        for (unit, &node) in assignment.iter().enumerate() {
            solution.reallocate(unit, node);
        }
        solution
    }

    /// Moves `unit` onto `node`, releasing its previous node if it had one.
    ///
    /// The previous node leaves the active set when this was its last unit;
    /// `node` joins it. This is the only way genes change.
    ///
    /// # Panics
    /// Panics if `unit` or `node` is out of range.
    pub fn reallocate(&mut self, unit: usize, node: usize) {
        assert!(node < self.occupancy.len(), "node index out of range");
        if let Some(old) = self.genes[unit].replace(node) {
            self.occupancy[old] -= 1;
            if self.occupancy[old] == 0 {
                self.active_count -= 1;
            }
        }
        if self.occupancy[node] == 0 {
            self.active_count += 1;
        }
        self.occupancy[node] += 1;
    }

    /// Node position assigned to `unit`, if any.
    pub fn node_of(&self, unit: usize) -> Option<usize> {
        self.genes.get(unit).copied().flatten()
    }

    /// Genes in unit order.
    pub fn genes(&self) -> &[Option<usize>] {
        &self.genes
    }

    /// Number of units encoded.
    pub fn unit_count(&self) -> usize {
        self.genes.len()
    }

    /// Number of nodes addressable by this solution.
    pub fn node_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Whether every unit has a node.
    pub fn is_complete(&self) -> bool {
        self.genes.iter().all(Option::is_some)
    }

    /// Number of nodes hosting at least one unit.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Whether `node` hosts at least one unit.
    pub fn is_active(&self, node: usize) -> bool {
        self.occupants(node) > 0
    }

    /// Positions of active nodes, ascending.
    pub fn active_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.occupancy
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(node, _)| node)
    }

    /// Number of units placed on `node`.
    pub fn occupants(&self, node: usize) -> usize {
        self.occupancy.get(node).copied().unwrap_or(0)
    }

    /// Positions of the units placed on `node`, ascending.
    pub fn units_on(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter(move |(_, gene)| **gene == Some(node))
            .map(|(unit, _)| unit)
    }

    /// Aggregate demand per node position.
    ///
    /// `units` must be the descriptor slice this solution was built for.
    pub fn node_loads(&self, units: &[WorkloadUnit]) -> Vec<Resources> {
        let mut loads = vec![Resources::ZERO; self.occupancy.len()];
        for (unit, gene) in units.iter().zip(&self.genes) {
            if let Some(node) = gene {
                loads[*node] += unit.demand;
            }
        }
        loads
    }

    /// Unit ID → node ID map for the assigned units.
    pub fn mapping(&self, units: &[WorkloadUnit], nodes: &[ResourceNode]) -> BTreeMap<u64, u64> {
        units
            .iter()
            .zip(&self.genes)
            .filter_map(|(unit, gene)| gene.map(|node| (unit.id, nodes[node].id)))
            .collect()
    }

    /// Returns the cached fitness.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Stores an evaluated fitness.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Whether a fitness has been stored since construction.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_finite()
    }
}
