//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};

/// Configuration of a placement search.
///
/// # Examples
///
/// ```
/// use u_placement::ga::PlacementConfig;
///
/// let config = PlacementConfig::default()
///     .with_population_size(80)
///     .with_max_generations(40)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Individuals per generation, elite included.
    pub population_size: usize,

    /// Generations to run after the initial population. The search has no
    /// convergence test; this is the whole budget.
    pub max_generations: usize,

    /// Probability that a gene is inherited from the first parent during
    /// uniform crossover.
    pub crossover_rate: f64,

    /// Probability that a child is mutated.
    pub mutation_rate: f64,

    /// Individuals drawn per tournament (with replacement).
    pub tournament_size: usize,

    /// Seed of the single random stream driving the search.
    pub seed: u64,

    /// Whether to evaluate each generation's offspring in parallel using rayon.
    /// Results are identical either way.
    pub parallel: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 20,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            tournament_size: 3,
            seed: 42,
            parallel: true,
        }
    }
}

impl PlacementConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_tournament_size(mut self, n: usize) -> Self {
        self.tournament_size = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(PlacementError::EmptyPopulation);
        }
        if self.tournament_size == 0 {
            return Err(PlacementError::EmptyTournament);
        }
        if self.tournament_size > self.population_size {
            return Err(PlacementError::TournamentTooLarge {
                tournament_size: self.tournament_size,
                population_size: self.population_size,
            });
        }
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        Ok(())
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PlacementError::RateOutOfRange { name, value })
    }
}
