//! Position within a running workout.
//!
//! A [`Position`] names exactly one phase of one round. It carries no
//! countdown state; remaining time lives in the session.

use serde::{Deserialize, Serialize};

use crate::plan::{Exercise, WorkoutPlan};

/// The kind of countdown segment a position denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// A work interval of the current set
    Work,
    /// Rest between two sets of the same exercise
    Rest,
    /// Rest between two rounds
    InterRoundRest,
}

impl PhaseKind {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Rest => "rest",
            Self::InterRoundRest => "inter_round_rest",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the workout is: exercise, set, round and phase kind.
///
/// `exercise_index` is 0-based; `set` and `round` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Index into `plan.exercises`
    pub exercise_index: usize,
    /// Current set of the exercise, in `1..=exercise.sets`
    pub set: u32,
    /// Current round, in `1..=plan.round_count`
    pub round: u32,
    /// Which segment of the set or round is active
    pub kind: PhaseKind,
}

impl Position {
    /// First work phase of the first exercise of round 1.
    pub const START: Self = Self {
        exercise_index: 0,
        set: 1,
        round: 1,
        kind: PhaseKind::Work,
    };

    /// Returns the exercise this position refers to, if any.
    #[must_use]
    pub fn exercise<'a>(&self, plan: &'a WorkoutPlan) -> Option<&'a Exercise> {
        plan.exercises.get(self.exercise_index)
    }

    /// Duration in seconds of the phase this position denotes.
    ///
    /// Returns 0 when the position does not reference an exercise.
    #[must_use]
    pub fn duration(&self, plan: &WorkoutPlan) -> u32 {
        match self.kind {
            PhaseKind::InterRoundRest => plan.round_rest_secs,
            PhaseKind::Work => self.exercise(plan).map_or(0, |e| e.work_secs),
            PhaseKind::Rest => self.exercise(plan).map_or(0, |e| e.rest_secs),
        }
    }

    /// Read-only view of the phase this position denotes.
    #[must_use]
    pub fn phase(&self, plan: &WorkoutPlan) -> Phase {
        let duration_secs = self.duration(plan);
        let label = match self.kind {
            PhaseKind::InterRoundRest => {
                format!("Rest before round {} of {}", self.round + 1, plan.round_count)
            }
            PhaseKind::Work => self.exercise(plan).map_or_else(
                || "Work".to_string(),
                |e| format!("{} - set {} of {}", e.name, self.set, e.sets),
            ),
            PhaseKind::Rest => self.exercise(plan).map_or_else(
                || "Rest".to_string(),
                |e| format!("Rest after {} set {}", e.name, self.set),
            ),
        };
        Phase {
            kind: self.kind,
            duration_secs,
            label,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// A phase as displayed: kind, full duration, and a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    /// Kind of the phase
    pub kind: PhaseKind,
    /// Full length of the phase in seconds
    pub duration_secs: u32,
    /// Human-readable label
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> WorkoutPlan {
        WorkoutPlan::new(
            "p",
            vec![
                Exercise::new("Squats", 3, 40, 20),
                Exercise::new("Plank", 1, 60, 0),
            ],
        )
        .with_rounds(2, 90)
    }

    #[test]
    fn start_is_first_work_phase() {
        assert_eq!(Position::default(), Position::START);
        assert_eq!(Position::START.duration(&plan()), 40);
    }

    #[test]
    fn duration_follows_kind() {
        let plan = plan();
        let rest = Position {
            kind: PhaseKind::Rest,
            ..Position::START
        };
        let round_rest = Position {
            kind: PhaseKind::InterRoundRest,
            ..Position::START
        };
        assert_eq!(rest.duration(&plan), 20);
        assert_eq!(round_rest.duration(&plan), 90);
    }

    #[test]
    fn out_of_range_exercise_has_zero_duration() {
        let plan = plan();
        let pos = Position {
            exercise_index: 7,
            ..Position::START
        };
        assert!(pos.exercise(&plan).is_none());
        assert_eq!(pos.duration(&plan), 0);
    }

    #[test]
    fn phase_labels() {
        let plan = plan();
        let work = Position {
            set: 2,
            ..Position::START
        };
        assert_eq!(work.phase(&plan).label, "Squats - set 2 of 3");
        let round_rest = Position {
            kind: PhaseKind::InterRoundRest,
            ..Position::START
        };
        assert_eq!(round_rest.phase(&plan).label, "Rest before round 2 of 2");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&PhaseKind::InterRoundRest).unwrap();
        assert_eq!(json, "\"inter_round_rest\"");
        assert_eq!(PhaseKind::Work.to_string(), "work");
    }
}
