//! Placement error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors reported before a search starts.
///
/// A search itself never fails: degenerate cases (no admissible mutation
/// target, a single workload unit) are handled inside the operators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("population_size must be at least 1")]
    EmptyPopulation,

    #[error("tournament_size must be at least 1")]
    EmptyTournament,

    #[error("tournament_size ({tournament_size}) exceeds population_size ({population_size})")]
    TournamentTooLarge {
        tournament_size: usize,
        population_size: usize,
    },

    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    #[error("invalid placement input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PlacementError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_display() {
        let err = PlacementError::TournamentTooLarge {
            tournament_size: 8,
            population_size: 4,
        };
        assert_eq!(
            err.to_string(),
            "tournament_size (8) exceeds population_size (4)"
        );

        let err = PlacementError::RateOutOfRange {
            name: "mutation_rate",
            value: 1.5,
        };
        assert_eq!(err.to_string(), "mutation_rate must be within [0, 1], got 1.5");
    }

    #[test]
    fn test_invalid_input_joins_messages() {
        let err = PlacementError::InvalidInput(vec![
            ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate node ID: 1"),
            ValidationError::new(ValidationErrorKind::NoNodes, "No resource nodes"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid placement input: Duplicate node ID: 1; No resource nodes"
        );
    }
}
