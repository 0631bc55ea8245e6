//! Planned duration of a workout.
//!
//! Rest only happens between sets of one exercise and between rounds,
//! never after the last set or the last round. The phase sequencer
//! follows the same rule, so the sum of all visited phase durations is
//! exactly [`total_duration`].

use super::{Exercise, WorkoutPlan};

/// Seconds spent on one exercise within a round.
#[must_use]
pub fn exercise_duration(exercise: &Exercise) -> u64 {
    let sets = u64::from(exercise.sets);
    sets * u64::from(exercise.work_secs) + sets.saturating_sub(1) * u64::from(exercise.rest_secs)
}

/// Seconds for one full pass over the exercise list, excluding round rest.
#[must_use]
pub fn round_duration(plan: &WorkoutPlan) -> u64 {
    plan.exercises.iter().map(exercise_duration).sum()
}

/// Total planned seconds of the plan.
///
/// An empty exercise list yields 0 regardless of the round count.
#[must_use]
pub fn total_duration(plan: &WorkoutPlan) -> u64 {
    if plan.exercises.is_empty() {
        return 0;
    }
    let rounds = u64::from(plan.round_count);
    rounds * round_duration(plan) + rounds.saturating_sub(1) * u64::from(plan.round_rest_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_set_has_no_rest() {
        let ex = Exercise::new("plank", 1, 60, 30);
        assert_eq!(exercise_duration(&ex), 60);
    }

    #[test]
    fn rest_only_between_sets() {
        let ex = Exercise::new("squat", 2, 5, 3);
        assert_eq!(exercise_duration(&ex), 13);
    }

    #[test]
    fn two_rounds_with_round_rest() {
        let plan = WorkoutPlan::new(
            "b",
            vec![
                Exercise::new("a", 1, 10, 0),
                Exercise::new("b", 1, 10, 0),
            ],
        )
        .with_rounds(2, 20);
        assert_eq!(round_duration(&plan), 20);
        assert_eq!(total_duration(&plan), 60);
    }

    #[test]
    fn single_round_ignores_round_rest() {
        let plan = WorkoutPlan::new("a", vec![Exercise::new("a", 2, 5, 3)]).with_rounds(1, 99);
        assert_eq!(total_duration(&plan), 13);
    }

    #[test]
    fn empty_plan_is_zero() {
        let plan = WorkoutPlan::new("empty", vec![]).with_rounds(5, 60);
        assert_eq!(total_duration(&plan), 0);
    }

    #[test]
    fn zero_sets_contributes_nothing() {
        let ex = Exercise::new("none", 0, 30, 10);
        assert_eq!(exercise_duration(&ex), 0);
    }
}
