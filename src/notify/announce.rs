//! Spoken announcement text for workout events.

use crate::phase::PhaseKind;

use super::{TransitionCause, WorkoutEvent};

/// Returns the sentence to speak for `event`.
#[must_use]
pub fn announcement(event: &WorkoutEvent) -> String {
    match event {
        WorkoutEvent::PhaseEntered {
            exercise_name,
            exercise_index,
            set,
            total_sets,
            round,
            total_rounds,
            kind,
            cause,
            ..
        } => match (cause, kind) {
            (TransitionCause::Skipped, PhaseKind::Work) => {
                format!("Skipped to {exercise_name}, set {set}.")
            }
            (TransitionCause::Skipped, PhaseKind::Rest) => {
                format!("Skipped to rest for {exercise_name}, set {set}.")
            }
            (TransitionCause::Skipped, PhaseKind::InterRoundRest) => {
                format!("Skipped to rest before round {}.", round + 1)
            }
            (TransitionCause::Started, PhaseKind::Work) => {
                format!("Starting {exercise_name}, set {set} of {total_sets}.")
            }
            (TransitionCause::Started | TransitionCause::Expired, PhaseKind::Rest) => {
                format!("Set {set} of {exercise_name} complete! Time for rest.")
            }
            (TransitionCause::Started | TransitionCause::Expired, PhaseKind::InterRoundRest) => {
                format!(
                    "Round {round} of {total_rounds} complete! Rest before round {}.",
                    round + 1
                )
            }
            (TransitionCause::Expired, PhaseKind::Work) if *set > 1 => {
                format!("Rest complete! Starting set {set} of {exercise_name}.")
            }
            (TransitionCause::Expired, PhaseKind::Work) if *exercise_index == 0 && *round > 1 => {
                format!("Round {round}! Starting {exercise_name}.")
            }
            (TransitionCause::Expired, PhaseKind::Work) => format!("Starting {exercise_name}."),
        },
        WorkoutEvent::Countdown { remaining_secs } => remaining_secs.to_string(),
        WorkoutEvent::WorkoutCompleted { plan_name, .. } => {
            format!("Workout \"{plan_name}\" completed!")
        }
    }
}
