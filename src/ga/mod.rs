//! GA-based energy-aware placement.
//!
//! Searches for an assignment of every workload unit to one resource node
//! that minimizes a composite cost of overload, waste, powered-on nodes and
//! communication distance.
//!
//! # Encoding
//!
//! One gene per workload unit, holding the node it is placed on
//! ([`AllocationSolution`]).
//!
//! # Submodules
//!
//! - [`operators`]: tournament selection, uniform crossover, constrained mutation
//!
//! # Reference
//! Beloglazov et al. (2012), "Energy-aware resource allocation heuristics for
//! efficient management of data centers for cloud computing"

mod config;
mod engine;
mod fitness;
pub mod operators;
mod solution;

pub use config::PlacementConfig;
pub use engine::{GeneticEngine, PlacementResult};
pub use fitness::{FitnessBreakdown, FitnessEvaluator, FitnessWeights};
pub use operators::{
    CONSOLIDATION_BIAS, Reallocation, admissible_nodes, constrained_mutation,
    tournament_selection, uniform_crossover,
};
pub use solution::AllocationSolution;
