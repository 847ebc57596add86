//! Generational search loop.
//!
//! # Algorithm
//!
//! 1. Build the communication matrix from the seeded stream.
//! 2. Create `population_size` random placements and evaluate them.
//! 3. For each generation: carry a clone of the global best (elitism), then
//!    fill the population with tournament → uniform crossover → optional
//!    constrained mutation offspring, evaluate them and fold them into the
//!    global best in production order.
//! 4. Return the best placement seen.
//!
//! All random draws happen on one stream in a fixed order. Offspring
//! evaluation consumes no randomness, so evaluating a generation's batch in
//! parallel gives the same result as evaluating each child as it is made.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::operators::{constrained_mutation, tournament_selection, uniform_crossover};
use super::{AllocationSolution, FitnessEvaluator, FitnessWeights, PlacementConfig};
use crate::error::{PlacementError, Result};
use crate::models::{CommunicationMatrix, ResourceNode, WorkloadUnit};
use crate::validation::validate_input;

/// Generations between progress log lines.
const LOG_INTERVAL: usize = 5;

/// Outcome of a search.
#[derive(Debug, Clone)]
pub struct PlacementResult {
    /// Best placement found across all generations.
    pub best: AllocationSolution,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Generations run (excluding the initial population).
    pub generations: usize,
    /// Global best fitness after initialization, then after each generation.
    pub history: Vec<f64>,
}

impl PlacementResult {
    /// Number of powered-on nodes in the best placement.
    pub fn active_count(&self) -> usize {
        self.best.active_count()
    }
}

/// Energy-aware genetic placement engine.
///
/// # Example
/// ```
/// use u_placement::ga::{GeneticEngine, PlacementConfig};
/// use u_placement::models::{ResourceNode, Resources, WorkloadUnit};
///
/// let nodes: Vec<_> = (0..4)
///     .map(|id| ResourceNode::new(id, Resources::new(4000.0, 16384.0, 1.0e6, 10000.0)))
///     .collect();
/// let units: Vec<_> = (0..8)
///     .map(|id| WorkloadUnit::new(id, Resources::new(1000.0, 2048.0, 1.0e5, 1000.0)))
///     .collect();
///
/// let config = PlacementConfig::default().with_seed(1);
/// let engine = GeneticEngine::new(&units, &nodes, config).unwrap();
/// let result = engine.run();
/// assert!(result.best.is_complete());
/// assert!(result.active_count() <= 4);
/// ```
#[derive(Debug, Clone)]
pub struct GeneticEngine {
    units: Vec<WorkloadUnit>,
    nodes: Vec<ResourceNode>,
    config: PlacementConfig,
    weights: FitnessWeights,
    communication: CommunicationMatrix,
    /// Stream state right after the matrix was drawn; each run starts here.
    rng: SmallRng,
}

impl GeneticEngine {
    /// Creates an engine, validating the configuration and descriptors.
    pub fn new(
        units: &[WorkloadUnit],
        nodes: &[ResourceNode],
        config: PlacementConfig,
    ) -> Result<Self> {
        config.validate()?;
        validate_input(units, nodes).map_err(PlacementError::InvalidInput)?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let communication = CommunicationMatrix::build(units.len(), &mut rng);

        Ok(Self {
            units: units.to_vec(),
            nodes: nodes.to_vec(),
            config,
            weights: FitnessWeights::default(),
            communication,
            rng,
        })
    }

    /// Sets the cost weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Workload units being placed.
    pub fn units(&self) -> &[WorkloadUnit] {
        &self.units
    }

    /// Resource nodes available for placement.
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// The search configuration.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Communication matrix drawn at construction.
    pub fn communication(&self) -> &CommunicationMatrix {
        &self.communication
    }

    /// An evaluator bound to this engine's descriptors and weights.
    pub fn evaluator(&self) -> FitnessEvaluator<'_> {
        FitnessEvaluator::new(&self.nodes, &self.units, &self.communication)
            .with_weights(self.weights.clone())
    }

    /// Runs the search to its generation budget.
    ///
    /// Repeated runs on the same engine return identical results.
    pub fn run(&self) -> PlacementResult {
        let config = &self.config;
        let evaluator = self.evaluator();
        let mut rng = self.rng.clone();

        info!(
            population = config.population_size,
            generations = config.max_generations,
            units = self.units.len(),
            nodes = self.nodes.len(),
            "starting placement search"
        );

        let mut population: Vec<AllocationSolution> = (0..config.population_size)
            .map(|_| AllocationSolution::random(self.units.len(), self.nodes.len(), &mut rng))
            .collect();
        self.evaluate_batch(&evaluator, &mut population);

        let mut best = population
            .iter()
            .min_by(|a, b| a.fitness().total_cmp(&b.fitness()))
            .cloned()
            .unwrap_or_else(|| AllocationSolution::unassigned(self.units.len(), self.nodes.len()));
        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(best.fitness());

        for generation in 0..config.max_generations {
            let mut offspring = Vec::with_capacity(config.population_size.saturating_sub(1));
            while offspring.len() + 1 < config.population_size {
                offspring.push(self.breed(&population, generation, &mut rng));
            }
            self.evaluate_batch(&evaluator, &mut offspring);

            let mut next = Vec::with_capacity(config.population_size);
            next.push(best.clone());
            for child in offspring {
                if child.fitness() < best.fitness() {
                    best = child.clone();
                }
                next.push(child);
            }
            population = next;
            history.push(best.fitness());

            if generation % LOG_INTERVAL == 0 || generation + 1 == config.max_generations {
                info!(
                    generation = generation + 1,
                    best_fitness = best.fitness(),
                    active_hosts = best.active_count(),
                    "Generation {}: Best Fitness = {:.4}, Active Hosts = {}",
                    generation + 1,
                    best.fitness(),
                    best.active_count()
                );
            }
        }

        info!(
            best_fitness = best.fitness(),
            active_hosts = best.active_count(),
            "placement search finished"
        );

        PlacementResult {
            best_fitness: best.fitness(),
            best,
            generations: config.max_generations,
            history,
        }
    }

    /// Produces one unevaluated child.
    fn breed(
        &self,
        population: &[AllocationSolution],
        generation: usize,
        rng: &mut SmallRng,
    ) -> AllocationSolution {
        let config = &self.config;
        let parent1 = tournament_selection(population, config.tournament_size, rng);
        let parent2 = tournament_selection(population, config.tournament_size, rng);
        let mut child = uniform_crossover(&parent1, &parent2, config.crossover_rate, rng);

        if rng.random::<f64>() < config.mutation_rate {
            match constrained_mutation(&mut child, &self.units, &self.nodes, rng) {
                Some(moved) => debug!(
                    generation,
                    unit = self.units[moved.unit].id,
                    to = self.nodes[moved.to].id,
                    "mutation moved unit"
                ),
                None => debug!(generation, "mutation skipped: no admissible node"),
            }
        }
        child
    }

    fn evaluate_batch(&self, evaluator: &FitnessEvaluator<'_>, batch: &mut [AllocationSolution]) {
        if self.config.parallel {
            batch.par_iter_mut().for_each(|solution| {
                let fitness = evaluator.evaluate(solution);
                solution.set_fitness(fitness);
            });
        } else {
            for solution in batch.iter_mut() {
                let fitness = evaluator.evaluate(solution);
                solution.set_fitness(fitness);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resources;

    fn fleet() -> (Vec<WorkloadUnit>, Vec<ResourceNode>) {
        let nodes = (0..6)
            .map(|id| ResourceNode::new(id, Resources::new(4000.0, 16_384.0, 1.0e6, 10_000.0)))
            .collect();
        let units = (0..12)
            .map(|id| {
                let scale = 1.0 + (id % 3) as f64 * 0.5;
                WorkloadUnit::new(
                    id,
                    Resources::new(1000.0 * scale, 2048.0 * scale, 1.0e5, 1000.0),
                )
            })
            .collect();
        (units, nodes)
    }

    fn config() -> PlacementConfig {
        PlacementConfig::default()
            .with_population_size(20)
            .with_max_generations(15)
            .with_seed(42)
    }

    #[test]
    fn test_run_basic() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(&units, &nodes, config()).unwrap();
        let result = engine.run();

        assert!(result.best.is_complete());
        assert_eq!(result.generations, 15);
        assert_eq!(result.history.len(), 16);
        assert!(result.best_fitness.is_finite());
        assert!((result.best_fitness - result.best.fitness()).abs() < 1e-12);
        assert!(result.active_count() >= 1 && result.active_count() <= 6);
    }

    #[test]
    fn test_best_fitness_matches_evaluator() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(&units, &nodes, config()).unwrap();
        let result = engine.run();
        let recomputed = engine.evaluator().evaluate(&result.best);
        assert!((recomputed - result.best_fitness).abs() < 1e-10);
    }

    #[test]
    fn test_history_non_increasing() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(&units, &nodes, config()).unwrap();
        let history = engine.run().history;
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0], "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_repeated_runs_identical() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(&units, &nodes, config()).unwrap();
        let a = engine.run();
        let b = engine.run();
        assert_eq!(a.history, b.history);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (units, nodes) = fleet();
        let parallel = GeneticEngine::new(&units, &nodes, config().with_parallel(true))
            .unwrap()
            .run();
        let sequential = GeneticEngine::new(&units, &nodes, config().with_parallel(false))
            .unwrap()
            .run();
        assert_eq!(parallel.history, sequential.history);
        assert_eq!(parallel.best, sequential.best);
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let (units, nodes) = fleet();
        let engine =
            GeneticEngine::new(&units, &nodes, config().with_max_generations(0)).unwrap();
        let result = engine.run();
        assert_eq!(result.generations, 0);
        assert_eq!(result.history.len(), 1);
        assert!(result.best.is_complete());
    }

    #[test]
    fn test_population_of_one() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(
            &units,
            &nodes,
            config().with_population_size(1).with_tournament_size(1),
        )
        .unwrap();
        let result = engine.run();
        // Only the elite survives each generation
        assert!(result.history.iter().all(|&f| f == result.history[0]));
    }

    #[test]
    fn test_no_units() {
        let (_, nodes) = fleet();
        let engine = GeneticEngine::new(&[], &nodes, config()).unwrap();
        let result = engine.run();
        assert_eq!(result.active_count(), 0);
        assert_eq!(result.best_fitness, 0.0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let (units, nodes) = fleet();
        let err = GeneticEngine::new(&units, &nodes, config().with_population_size(0)).unwrap_err();
        assert_eq!(err, PlacementError::EmptyPopulation);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let (units, _) = fleet();
        let err = GeneticEngine::new(&units, &[], config()).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidInput(_)));
    }

    #[test]
    fn test_matrix_sized_to_units() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(&units, &nodes, config()).unwrap();
        assert_eq!(engine.communication().size(), units.len());
    }

    #[test]
    fn test_engine_keeps_descriptors() {
        let (units, nodes) = fleet();
        let engine = GeneticEngine::new(&units, &nodes, config().with_seed(3)).unwrap();
        assert_eq!(engine.units(), units.as_slice());
        assert_eq!(engine.nodes(), nodes.as_slice());
        assert_eq!(engine.config().seed, 3);
    }

    #[test]
    fn test_search_consolidates() {
        // Two units that fit together on one node: the single-node placement
        // (3.0 active cost) beats any spread placement (6.0 + communication).
        let nodes: Vec<_> = (0..5)
            .map(|id| ResourceNode::new(id, Resources::new(1000.0, 1000.0, 1000.0, 1000.0)))
            .collect();
        let units: Vec<_> = (0..2)
            .map(|id| WorkloadUnit::new(id, Resources::new(400.0, 400.0, 400.0, 400.0)))
            .collect();
        let engine = GeneticEngine::new(
            &units,
            &nodes,
            PlacementConfig::default().with_seed(3).with_max_generations(30),
        )
        .unwrap();
        let result = engine.run();
        assert_eq!(result.active_count(), 1);
    }
}
