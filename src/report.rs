//! Placement quality metrics.
//!
//! Computes what a harness reports alongside the fitness of a finished
//! placement.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Active nodes | Nodes hosting at least one unit |
//! | Node utilization | Aggregate demand / capacity, per dimension |
//! | Avg utilization | Mean over active nodes of their mean dimension utilization |
//! | Overloaded nodes | Active nodes exceeding capacity on any dimension |
//! | Unplaced units | Units without a node |

use std::collections::BTreeMap;

use crate::ga::AllocationSolution;
use crate::models::{DIMENSIONS, ResourceNode, WorkloadUnit};

/// Utilization of one active node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUtilization {
    /// Node ID.
    pub node_id: u64,
    /// Units placed on the node.
    pub unit_count: usize,
    /// Demand / capacity for compute, memory, storage, bandwidth.
    pub utilization: [f64; DIMENSIONS],
}

impl NodeUtilization {
    /// Mean utilization across the four dimensions.
    pub fn average(&self) -> f64 {
        self.utilization.iter().sum::<f64>() / DIMENSIONS as f64
    }

    /// Whether any dimension exceeds capacity.
    pub fn is_overloaded(&self) -> bool {
        self.utilization.iter().any(|&u| u > 1.0)
    }
}

/// Placement performance indicators.
#[derive(Debug, Clone)]
pub struct PlacementReport {
    /// Number of active nodes.
    pub active_nodes: usize,
    /// Total number of nodes available.
    pub total_nodes: usize,
    /// Per-node utilization, active nodes only, keyed by node ID.
    pub utilization_by_node: BTreeMap<u64, NodeUtilization>,
    /// Mean of the per-node average utilization (0.0 with no active node).
    pub avg_utilization: f64,
    /// IDs of active nodes over capacity on any dimension, ascending.
    pub overloaded_nodes: Vec<u64>,
    /// IDs of units without a node.
    pub unplaced_units: Vec<u64>,
}

impl PlacementReport {
    /// Computes metrics for a placement.
    ///
    /// # Arguments
    /// * `solution` - The placement to inspect.
    /// * `units` - The unit descriptors the placement was built for.
    /// * `nodes` - The node descriptors the placement was built for.
    pub fn calculate(
        solution: &AllocationSolution,
        units: &[WorkloadUnit],
        nodes: &[ResourceNode],
    ) -> Self {
        let loads = solution.node_loads(units);

        let utilization_by_node: BTreeMap<u64, NodeUtilization> = solution
            .active_nodes()
            .map(|node| {
                let descriptor = &nodes[node];
                (
                    descriptor.id,
                    NodeUtilization {
                        node_id: descriptor.id,
                        unit_count: solution.occupants(node),
                        utilization: loads[node].ratio_to(&descriptor.capacity),
                    },
                )
            })
            .collect();

        let avg_utilization = if utilization_by_node.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_node.values().map(NodeUtilization::average).sum();
            sum / utilization_by_node.len() as f64
        };

        let overloaded_nodes = utilization_by_node
            .values()
            .filter(|u| u.is_overloaded())
            .map(|u| u.node_id)
            .collect();

        let unplaced_units = units
            .iter()
            .enumerate()
            .filter(|(unit, _)| solution.node_of(*unit).is_none())
            .map(|(_, descriptor)| descriptor.id)
            .collect();

        Self {
            active_nodes: solution.active_count(),
            total_nodes: nodes.len(),
            utilization_by_node,
            avg_utilization,
            overloaded_nodes,
            unplaced_units,
        }
    }

    /// Fraction of nodes that can be powered off (0.0..1.0).
    pub fn idle_fraction(&self) -> f64 {
        if self.total_nodes == 0 {
            0.0
        } else {
            1.0 - self.active_nodes as f64 / self.total_nodes as f64
        }
    }

    /// Whether the placement is complete and within capacity everywhere.
    pub fn is_feasible(&self) -> bool {
        self.overloaded_nodes.is_empty() && self.unplaced_units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resources;

    fn fleet() -> (Vec<WorkloadUnit>, Vec<ResourceNode>) {
        let nodes = vec![
            ResourceNode::new(10, Resources::new(1000.0, 1000.0, 1000.0, 1000.0)),
            ResourceNode::new(20, Resources::new(2000.0, 2000.0, 2000.0, 2000.0)),
            ResourceNode::new(30, Resources::new(1000.0, 1000.0, 1000.0, 1000.0)),
        ];
        let units = vec![
            WorkloadUnit::new(1, Resources::new(600.0, 200.0, 200.0, 200.0)),
            WorkloadUnit::new(2, Resources::new(600.0, 200.0, 200.0, 200.0)),
            WorkloadUnit::new(3, Resources::new(1000.0, 1000.0, 1000.0, 1000.0)),
        ];
        (units, nodes)
    }

    #[test]
    fn test_report_basic() {
        let (units, nodes) = fleet();
        let s = AllocationSolution::from_assignment(&[1, 1, 1], 3);
        let report = PlacementReport::calculate(&s, &units, &nodes);

        assert_eq!(report.active_nodes, 1);
        assert_eq!(report.total_nodes, 3);
        let node = &report.utilization_by_node[&20];
        assert_eq!(node.unit_count, 3);
        // compute 2200/2000, others 1400/2000
        assert!((node.utilization[0] - 1.1).abs() < 1e-10);
        assert!((node.utilization[1] - 0.7).abs() < 1e-10);
        assert!((report.avg_utilization - 0.8).abs() < 1e-10);
        assert_eq!(report.overloaded_nodes, vec![20]);
        assert!(!report.is_feasible());
        assert!((report.idle_fraction() - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_report_feasible() {
        let (units, nodes) = fleet();
        let s = AllocationSolution::from_assignment(&[0, 1, 2], 3);
        let report = PlacementReport::calculate(&s, &units, &nodes);

        assert_eq!(report.active_nodes, 3);
        assert!(report.overloaded_nodes.is_empty());
        assert!(report.is_feasible());
        // Exactly at capacity is not overloaded
        assert!((report.utilization_by_node[&30].average() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_report_unplaced() {
        let (units, nodes) = fleet();
        let mut s = AllocationSolution::unassigned(3, 3);
        s.reallocate(0, 0);
        let report = PlacementReport::calculate(&s, &units, &nodes);

        assert_eq!(report.unplaced_units, vec![2, 3]);
        assert!(!report.is_feasible());
    }

    #[test]
    fn test_report_empty() {
        let report = PlacementReport::calculate(&AllocationSolution::unassigned(0, 0), &[], &[]);
        assert_eq!(report.active_nodes, 0);
        assert!((report.avg_utilization - 0.0).abs() < 1e-10);
        assert!((report.idle_fraction() - 0.0).abs() < 1e-10);
        assert!(report.is_feasible());
    }
}
