//! Energy-aware placement cost.
//!
//! The cost of a placement is the sum of four terms:
//!
//! | Term | Scope | Default weight |
//! |------|-------|----------------|
//! | Overload | per active node, per exceeded dimension | 10.0 × relative excess |
//! | Waste | per active node | 2.0 below 30% avg utilization, else 0.5 × idle share |
//! | Active nodes | global | 3.0 per powered-on node |
//! | Communication | global | 1.0 × normalized distance-weighted traffic |
//!
//! Idle nodes are treated as powered off and contribute nothing. The
//! active-node term dominates, which pushes the search toward consolidation;
//! the overload term keeps consolidation from packing past capacity.

use serde::{Deserialize, Serialize};

use super::AllocationSolution;
use crate::models::{CommunicationMatrix, DIMENSIONS, ResourceNode, WorkloadUnit};

/// Weights and thresholds of the cost function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Multiplier on the relative excess of each overloaded dimension.
    pub overload: f64,
    /// Average utilization under which a node counts as lightly used.
    pub low_utilization_threshold: f64,
    /// Penalty scale for lightly used nodes.
    pub low_utilization: f64,
    /// Penalty scale for residual idle capacity on well-used nodes.
    pub residual_waste: f64,
    /// Cost of each powered-on node.
    pub active_node: f64,
    /// Multiplier on the normalized communication cost.
    pub communication: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            overload: 10.0,
            low_utilization_threshold: 0.3,
            low_utilization: 2.0,
            residual_waste: 0.5,
            active_node: 3.0,
            communication: 1.0,
        }
    }
}

/// Cost split by term. [`total`](FitnessBreakdown::total) is the fitness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub overload: f64,
    pub waste: f64,
    pub active_nodes: f64,
    pub communication: f64,
}

impl FitnessBreakdown {
    /// Sum of all terms.
    pub fn total(&self) -> f64 {
        self.overload + self.waste + self.active_nodes + self.communication
    }
}

/// Evaluates placements against fixed descriptors.
///
/// Holds only shared references, so one evaluator can score a whole
/// generation from several threads.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    nodes: &'a [ResourceNode],
    units: &'a [WorkloadUnit],
    communication: &'a CommunicationMatrix,
    weights: FitnessWeights,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator with the default weights.
    ///
    /// # Panics
    /// Panics if `communication` does not have one row per unit.
    pub fn new(
        nodes: &'a [ResourceNode],
        units: &'a [WorkloadUnit],
        communication: &'a CommunicationMatrix,
    ) -> Self {
        assert_eq!(
            communication.size(),
            units.len(),
            "communication matrix must have one row per unit"
        );
        Self {
            nodes,
            units,
            communication,
            weights: FitnessWeights::default(),
        }
    }

    /// Replaces the weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The weights in use.
    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    /// Computes the fitness of `solution` (lower = better, never negative).
    ///
    /// Does not store the result; callers use
    /// [`AllocationSolution::set_fitness`].
    pub fn evaluate(&self, solution: &AllocationSolution) -> f64 {
        self.breakdown(solution).total()
    }

    /// Computes each cost term separately.
    pub fn breakdown(&self, solution: &AllocationSolution) -> FitnessBreakdown {
        let w = &self.weights;
        let loads = solution.node_loads(self.units);
        let mut result = FitnessBreakdown::default();

        for node in solution.active_nodes() {
            let capacity = self.nodes[node].capacity.as_array();
            let demand = loads[node].as_array();

            for d in 0..DIMENSIONS {
                if demand[d] > capacity[d] {
                    result.overload += w.overload * (demand[d] - capacity[d]) / capacity[d];
                }
            }

            let avg_utilization =
                (0..DIMENSIONS).map(|d| demand[d] / capacity[d]).sum::<f64>() / DIMENSIONS as f64;
            if avg_utilization < w.low_utilization_threshold {
                result.waste += w.low_utilization * (w.low_utilization_threshold - avg_utilization)
                    / w.low_utilization_threshold;
            } else {
                let idle_share = (0..DIMENSIONS)
                    .map(|d| (capacity[d] - demand[d]).max(0.0) / capacity[d])
                    .sum::<f64>()
                    / DIMENSIONS as f64;
                result.waste += w.residual_waste * idle_share;
            }
        }

        result.active_nodes = w.active_node * solution.active_count() as f64;
        result.communication = w.communication * self.communication_cost(solution);
        result
    }

    /// Normalized communication cost.
    ///
    /// Every pair `i < j` on different nodes costs its intensity times
    /// `|node_id_i - node_id_j| + 1`; the sum is divided by `N(N-1)/2`.
    /// Zero for fewer than two units.
    pub fn communication_cost(&self, solution: &AllocationSolution) -> f64 {
        let pairs = self.communication.pair_count();
        if pairs == 0 {
            return 0.0;
        }

        let unit_count = self.communication.size();
        let mut cost = 0.0;
        for i in 0..unit_count {
            let Some(node_i) = solution.node_of(i) else {
                continue;
            };
            for j in (i + 1)..unit_count {
                let intensity = self.communication.weight(i, j);
                if intensity <= 0.0 {
                    continue;
                }
                match solution.node_of(j) {
                    Some(node_j) if node_j != node_i => {
                        let distance =
                            self.nodes[node_i].id.abs_diff(self.nodes[node_j].id) as f64 + 1.0;
                        cost += intensity * distance;
                    }
                    _ => {}
                }
            }
        }
        cost / pairs as f64
    }
}
