//! Workout plan validation
//!
//! Validation collects ALL issues instead of stopping at the first one,
//! so a plan file can be fixed in a single pass. An empty exercise list
//! is only a warning: the plan is valid data, sessions refuse to start it.

use std::collections::HashSet;

use crate::error::{Severity, ValidationIssue};
use crate::plan::WorkoutPlan;
use crate::plan::loader::PlanLimits;

// ============================================================================
// Public API
// ============================================================================

/// Result of plan validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Plan validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a plan against structural rules and the given limits.
    pub fn validate(&mut self, plan: &WorkoutPlan, limits: &PlanLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_metadata(plan);
        self.validate_exercises(plan, limits);
        self.validate_rounds(plan, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_metadata(&mut self, plan: &WorkoutPlan) {
        if plan.name.trim().is_empty() {
            self.add_error("name", "plan name is required and cannot be empty");
        }
        if plan.id.trim().is_empty() {
            self.add_error("id", "plan id cannot be empty");
        }
    }

    fn validate_exercises(&mut self, plan: &WorkoutPlan, limits: &PlanLimits) {
        if plan.exercises.is_empty() {
            self.add_warning(
                "exercises",
                "plan has no exercises; a session cannot be started on it",
            );
            return;
        }

        if plan.exercises.len() > limits.max_exercises {
            self.add_error(
                "exercises",
                &format!(
                    "plan has {} exercises (limit: {})",
                    plan.exercises.len(),
                    limits.max_exercises
                ),
            );
        }

        let mut seen_ids = HashSet::new();
        for (i, exercise) in plan.exercises.iter().enumerate() {
            let path = format!("exercises[{i}]");

            if !seen_ids.insert(exercise.id.as_str()) {
                self.add_error(
                    &format!("{path}.id"),
                    &format!("duplicate exercise id '{}'", exercise.id),
                );
            }

            if exercise.name.trim().is_empty() {
                self.add_warning(&format!("{path}.name"), "exercise name is empty");
            }

            if exercise.sets < 1 {
                self.add_error(&format!("{path}.sets"), "sets must be at least 1");
            } else if exercise.sets > limits.max_sets {
                self.add_error(
                    &format!("{path}.sets"),
                    &format!("{} sets exceeds the limit of {}", exercise.sets, limits.max_sets),
                );
            }

            if exercise.work_secs < 1 {
                self.add_error(&format!("{path}.work"), "work duration must be at least 1s");
            }

            if exercise.sets == 1 && exercise.rest_secs > 0 {
                self.add_warning(
                    &format!("{path}.rest"),
                    "rest is never used for an exercise with a single set",
                );
            }
        }
    }

    fn validate_rounds(&mut self, plan: &WorkoutPlan, limits: &PlanLimits) {
        if plan.round_count < 1 {
            self.add_error("rounds", "rounds must be at least 1");
            return;
        }

        if plan.round_count > limits.max_rounds {
            self.add_error(
                "rounds",
                &format!(
                    "{} rounds exceeds the limit of {}",
                    plan.round_count, limits.max_rounds
                ),
            );
        }

        if plan.round_count == 1 && plan.round_rest_secs > 0 {
            self.add_warning(
                "round_rest",
                "rest between rounds is never used with a single round",
            );
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
