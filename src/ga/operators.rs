//! Genetic operators for placement genomes.
//!
//! - **Selection**: tournament with replacement, lowest fitness wins.
//! - **Crossover**: uniform, one independent draw per unit.
//! - **Mutation**: single-unit move restricted to nodes with room for the
//!   unit, biased toward nodes that are already powered on.
//!
//! Every operator takes the RNG explicitly; for a given RNG state the
//! result and the number of draws are fixed.

use rand::Rng;
use rand::prelude::IndexedRandom;

use super::AllocationSolution;
use crate::models::{ResourceNode, Resources, WorkloadUnit};

/// Probability of restricting a mutation to already-active nodes.
pub const CONSOLIDATION_BIAS: f64 = 0.7;

/// A single-unit move performed by [`constrained_mutation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reallocation {
    /// Position of the moved unit.
    pub unit: usize,
    /// Node position before the move.
    pub from: Option<usize>,
    /// Node position after the move.
    pub to: usize,
}

// ======================== Selection ========================

/// Tournament selection.
///
/// Draws `tournament_size` individuals uniformly with replacement and
/// returns a clone of the one with the lowest fitness. Ties keep the
/// earliest draw. A size of 0 is treated as 1.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament_selection<R: Rng>(
    population: &[AllocationSolution],
    tournament_size: usize,
    rng: &mut R,
) -> AllocationSolution {
    assert!(!population.is_empty(), "tournament over an empty population");
    let mut best = &population[rng.random_range(0..population.len())];
    for _ in 1..tournament_size {
        let candidate = &population[rng.random_range(0..population.len())];
        if candidate.fitness() < best.fitness() {
            best = candidate;
        }
    }
    best.clone()
}

// ======================== Crossover ========================

/// Uniform crossover.
///
/// For each unit, a uniform draw below `crossover_rate` copies the gene from
/// `parent1`, otherwise from `parent2`. A gene missing in the chosen parent
/// leaves the unit unassigned in the child; the other parent is not
/// consulted. The child is unevaluated.
pub fn uniform_crossover<R: Rng>(
    parent1: &AllocationSolution,
    parent2: &AllocationSolution,
    crossover_rate: f64,
    rng: &mut R,
) -> AllocationSolution {
    let mut child = AllocationSolution::unassigned(parent1.unit_count(), parent1.node_count());
    for unit in 0..parent1.unit_count() {
        let donor = if rng.random::<f64>() < crossover_rate {
            parent1
        } else {
            parent2
        };
        if let Some(node) = donor.node_of(unit) {
            child.reallocate(unit, node);
        }
    }
    child
}

// ======================== Mutation ========================

/// Node positions that can take `unit` without exceeding any capacity.
///
/// The unit's own demand is counted once: it is removed from its current
/// node before the check, so staying put is admissible whenever the node
/// fits the unit alongside its other occupants.
pub fn admissible_nodes(
    solution: &AllocationSolution,
    units: &[WorkloadUnit],
    nodes: &[ResourceNode],
    unit: usize,
) -> Vec<usize> {
    let loads = loads_without(solution, units, unit);
    let demand = units[unit].demand;
    nodes
        .iter()
        .enumerate()
        .filter(|(node, descriptor)| (loads[*node] + demand).fits_within(&descriptor.capacity))
        .map(|(node, _)| node)
        .collect()
}

/// Constrained, consolidation-biased mutation.
///
/// Picks one unit at random and moves it to an admissible node (see
/// [`admissible_nodes`]). With probability [`CONSOLIDATION_BIAS`] the target
/// is drawn from admissible nodes already hosting other units, when there
/// are any; otherwise from all admissible nodes.
///
/// Returns `None` without touching the solution when there are no units or
/// no admissible node.
pub fn constrained_mutation<R: Rng>(
    solution: &mut AllocationSolution,
    units: &[WorkloadUnit],
    nodes: &[ResourceNode],
    rng: &mut R,
) -> Option<Reallocation> {
    if units.is_empty() {
        return None;
    }
    let unit = rng.random_range(0..units.len());
    let admissible = admissible_nodes(solution, units, nodes, unit);
    if admissible.is_empty() {
        return None;
    }

    let current = solution.node_of(unit);
    let occupied: Vec<usize> = admissible
        .iter()
        .copied()
        .filter(|&node| {
            let own = usize::from(current == Some(node));
            solution.occupants(node) > own
        })
        .collect();

    let pool = if !occupied.is_empty() && rng.random::<f64>() < CONSOLIDATION_BIAS {
        &occupied
    } else {
        &admissible
    };
    let target = *pool.choose(rng)?;

    solution.reallocate(unit, target);
    Some(Reallocation {
        unit,
        from: current,
        to: target,
    })
}

fn loads_without(
    solution: &AllocationSolution,
    units: &[WorkloadUnit],
    skip: usize,
) -> Vec<Resources> {
    let mut loads = vec![Resources::ZERO; solution.node_count()];
    for (unit, gene) in solution.genes().iter().enumerate() {
        if unit == skip {
            continue;
        }
        if let Some(node) = gene {
            loads[*node] += units[unit].demand;
        }
    }
    loads
}
