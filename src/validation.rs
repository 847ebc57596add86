//! Input validation for placement problems.
//!
//! Checks the descriptors handed in by the simulation before any search
//! starts. Detects:
//! - Duplicate node or unit IDs
//! - Non-positive or non-finite node capacities (capacities are divisors
//!   in every utilization ratio)
//! - Negative or non-finite unit demands
//! - Workload units with no node to place them on

use std::collections::HashSet;

use crate::models::{ResourceNode, WorkloadUnit};

const DIMENSION_NAMES: [&str; 4] = ["compute", "memory", "storage", "bandwidth"];

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two nodes or two units share the same ID.
    DuplicateId,
    /// A node capacity is zero, negative, NaN or infinite.
    InvalidCapacity,
    /// A unit demand is negative, NaN or infinite.
    InvalidDemand,
    /// Units were given but no nodes.
    NoNodes,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the descriptors of a placement problem.
///
/// Checks:
/// 1. No duplicate node IDs
/// 2. No duplicate unit IDs
/// 3. Every node capacity is finite and strictly positive
/// 4. Every unit demand is finite and non-negative
/// 5. At least one node exists when there are units to place
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(units: &[WorkloadUnit], nodes: &[ResourceNode]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut node_ids = HashSet::new();
    for node in nodes {
        if !node_ids.insert(node.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate node ID: {}", node.id),
            ));
        }
        for (name, value) in DIMENSION_NAMES.iter().zip(node.capacity.as_array()) {
            if !value.is_finite() || value <= 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCapacity,
                    format!("Node {} has invalid {name} capacity: {value}", node.id),
                ));
            }
        }
    }

    let mut unit_ids = HashSet::new();
    for unit in units {
        if !unit_ids.insert(unit.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate unit ID: {}", unit.id),
            ));
        }
        for (name, value) in DIMENSION_NAMES.iter().zip(unit.demand.as_array()) {
            if !value.is_finite() || value < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDemand,
                    format!("Unit {} has invalid {name} demand: {value}", unit.id),
                ));
            }
        }
    }

    if nodes.is_empty() && !units.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoNodes,
            format!("{} workload units but no resource nodes", units.len()),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
