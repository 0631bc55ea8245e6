//! Phase sequencer: the workout state machine.
//!
//! [`advance`] is a pure, total function from a position to the next
//! position (or completion). Natural expiry and skip both go through it,
//! so a skipped phase never takes a different path than an expired one.
//!
//! Precedence when a work phase ends: set boundary, then exercise
//! boundary, then round boundary. Rest only occurs between two sets of
//! the same exercise and round rest only between two rounds, which is
//! what makes the visited durations add up to
//! [`total_duration`](crate::plan::total_duration).

use serde::Serialize;

use crate::plan::WorkoutPlan;

use super::position::{PhaseKind, Position};

/// Outcome of advancing past the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The workout continues at this position
    Next(Position),
    /// The last work phase of the last round has ended
    Completed,
}

/// Computes the position that follows `position` in `plan`.
///
/// A position whose exercise index is out of range is treated as the end
/// of the workout.
#[must_use]
pub fn advance(plan: &WorkoutPlan, position: Position) -> Advance {
    let Position {
        exercise_index,
        set,
        round,
        kind,
    } = position;

    match kind {
        PhaseKind::Work => {
            let Some(exercise) = plan.exercises.get(exercise_index) else {
                return Advance::Completed;
            };
            if set < exercise.sets {
                Advance::Next(Position {
                    kind: PhaseKind::Rest,
                    ..position
                })
            } else if exercise_index + 1 < plan.exercises.len() {
                Advance::Next(Position {
                    exercise_index: exercise_index + 1,
                    set: 1,
                    round,
                    kind: PhaseKind::Work,
                })
            } else if round < plan.round_count {
                // Round not incremented until the round rest ends.
                Advance::Next(Position {
                    exercise_index: 0,
                    set: 1,
                    round,
                    kind: PhaseKind::InterRoundRest,
                })
            } else {
                Advance::Completed
            }
        }
        PhaseKind::Rest => Advance::Next(Position {
            set: set + 1,
            kind: PhaseKind::Work,
            ..position
        }),
        PhaseKind::InterRoundRest => Advance::Next(Position {
            exercise_index: 0,
            set: 1,
            round: round + 1,
            kind: PhaseKind::Work,
        }),
    }
}

/// Iterator over every position of a plan, in execution order.
///
/// Yields nothing for a plan that is not runnable.
#[derive(Debug, Clone)]
pub struct Phases<'a> {
    plan: &'a WorkoutPlan,
    next: Option<Position>,
}

impl<'a> Phases<'a> {
    /// Starts iterating at [`Position::START`].
    #[must_use]
    pub fn new(plan: &'a WorkoutPlan) -> Self {
        Self {
            plan,
            next: plan.is_runnable().then_some(Position::START),
        }
    }
}

impl Iterator for Phases<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let current = self.next?;
        self.next = match advance(self.plan, current) {
            Advance::Next(p) => Some(p),
            Advance::Completed => None,
        };
        Some(current)
    }
}

/// One row of a workout timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Seconds from workout start at which this phase begins
    pub starts_at: u64,
    /// The phase position
    pub position: Position,
    /// Exercise name (empty for round rest)
    pub exercise_name: String,
    /// Phase length in seconds
    pub duration_secs: u32,
}

/// Full timeline of a plan, including zero-length phases.
#[must_use]
pub fn outline(plan: &WorkoutPlan) -> Vec<OutlineEntry> {
    let mut starts_at = 0u64;
    Phases::new(plan)
        .map(|position| {
            let duration_secs = position.duration(plan);
            let exercise_name = match position.kind {
                PhaseKind::InterRoundRest => String::new(),
                PhaseKind::Work | PhaseKind::Rest => position
                    .exercise(plan)
                    .map(|e| e.name.clone())
                    .unwrap_or_default(),
            };
            let entry = OutlineEntry {
                starts_at,
                position,
                exercise_name,
                duration_secs,
            };
            starts_at += u64::from(duration_secs);
            entry
        })
        .collect()
}
