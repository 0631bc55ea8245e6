//! Synchronous session core.
//!
//! [`Session`] owns the live [`SessionState`] and is its only writer.
//! Every operation runs to completion before the next one starts; the
//! async wiring in [`super::controller`] serializes access with a mutex.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::history::{HistoryRecorder, NoopRecorder};
use crate::notify::{NoopNotifier, Notifier, TransitionCause, WorkoutEvent};
use crate::observability::metrics;
use crate::phase::{Advance, Position, advance};
use crate::plan::{WorkoutPlan, total_duration};

use super::state::{SessionSnapshot, SessionState};

/// Remaining seconds at which a [`WorkoutEvent::Countdown`] is emitted.
pub const COUNTDOWN_SECS: u32 = 3;

/// A single workout session.
///
/// Each change to whether the clock should run bumps
/// [`generation`](Self::generation), as does any operation that restarts a
/// phase. A tick driver started for an older generation is stale.
pub struct Session {
    state: SessionState,
    generation: u64,
    notifier: Arc<dyn Notifier>,
    recorder: Arc<dyn HistoryRecorder>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates an idle session at the first phase of `plan`.
    #[must_use]
    pub fn new(
        plan: WorkoutPlan,
        notifier: Arc<dyn Notifier>,
        recorder: Arc<dyn HistoryRecorder>,
    ) -> Self {
        Self {
            state: SessionState::new(plan),
            generation: 0,
            notifier,
            recorder,
        }
    }

    /// Creates a session that reports to nobody.
    #[must_use]
    pub fn detached(plan: WorkoutPlan) -> Self {
        Self::new(plan, Arc::new(NoopNotifier), Arc::new(NoopRecorder))
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn plan(&self) -> &WorkoutPlan {
        &self.state.plan
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick driver should be running for this session.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.state.is_ticking()
    }

    /// Planned duration of the whole workout.
    #[must_use]
    pub fn total_duration(&self) -> u64 {
        total_duration(&self.state.plan)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.state)
    }

    /// Starts the session, or resumes it when paused.
    ///
    /// Starting from idle keeps a non-zero remaining time and announces
    /// the current phase. Resuming is silent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyPlan`] or [`SessionError::NoRounds`]
    /// when the plan cannot run. State is left untouched.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state.plan.exercises.is_empty() {
            warn!(plan = %self.state.plan.name, "cannot start: no exercises");
            return Err(SessionError::EmptyPlan);
        }
        if self.state.plan.round_count == 0 {
            warn!(plan = %self.state.plan.name, "cannot start: no rounds");
            return Err(SessionError::NoRounds);
        }

        if self.state.running {
            if self.state.paused {
                self.state.paused = false;
                self.bump();
                info!(remaining_secs = self.state.remaining_secs, "session resumed");
            }
            return Ok(());
        }

        self.state.running = true;
        self.state.paused = false;
        self.bump();
        metrics::record_session_started();
        info!(
            plan = %self.state.plan.name,
            total_secs = self.total_duration(),
            "session started"
        );

        if self.state.remaining_secs == 0 {
            self.enter(self.state.position, TransitionCause::Started);
        } else {
            self.announce(TransitionCause::Started);
            self.countdown();
        }
        Ok(())
    }

    /// Holds a running session. No-op otherwise.
    pub fn pause(&mut self) {
        if !self.state.is_ticking() {
            debug!(status = %self.state.status(), "pause ignored");
            return;
        }
        self.state.paused = true;
        self.bump();
        info!(remaining_secs = self.state.remaining_secs, "session paused");
    }

    /// Returns to the first phase and stops. The plan is kept.
    pub fn reset(&mut self) {
        self.state.rewind();
        self.bump();
        metrics::set_elapsed(0);
        info!(plan = %self.state.plan.name, "session reset");
    }

    /// Ends the current phase now.
    ///
    /// The skipped phase's remaining time counts as elapsed. A paused
    /// session resumes on the new phase.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoCurrentExercise`] if the position does not
    /// reference an exercise. State is left untouched.
    pub fn skip(&mut self) -> Result<(), SessionError> {
        if self.state.current_exercise().is_none() {
            warn!(
                exercise_index = self.state.position.exercise_index,
                "cannot skip: no current exercise"
            );
            return Err(SessionError::NoCurrentExercise);
        }

        let skipped = self.state.position;
        self.state.elapsed_secs += u64::from(self.state.remaining_secs);
        self.state.remaining_secs = 0;
        self.state.paused = false;
        self.bump();
        metrics::record_skip();
        metrics::set_elapsed(self.state.elapsed_secs);
        debug!(kind = %skipped.kind, set = skipped.set, round = skipped.round, "phase skipped");

        match advance(&self.state.plan, skipped) {
            Advance::Next(next) => self.enter(next, TransitionCause::Skipped),
            Advance::Completed => self.complete(),
        }
        Ok(())
    }

    /// Replaces the plan and resets the session. Does not start.
    pub fn set_plan(&mut self, plan: WorkoutPlan) {
        info!(
            plan = %plan.name,
            exercises = plan.exercises.len(),
            total_secs = total_duration(&plan),
            "plan loaded"
        );
        self.state = SessionState::new(plan);
        self.bump();
        metrics::set_elapsed(0);
    }

    /// Advances the clock by one second.
    ///
    /// Ignored unless the session is running and not paused. Emits a
    /// countdown event on every second that ends with [`COUNTDOWN_SECS`]
    /// or less remaining, including a short phase just entered. Enters the
    /// next phase when the current one runs out.
    pub fn tick(&mut self) {
        if !self.state.is_ticking() {
            debug!(status = %self.state.status(), "tick ignored");
            return;
        }

        if self.state.remaining_secs > 1 {
            self.state.remaining_secs -= 1;
            self.state.elapsed_secs += 1;
            metrics::set_elapsed(self.state.elapsed_secs);
            self.countdown();
            return;
        }

        self.state.elapsed_secs += u64::from(self.state.remaining_secs);
        self.state.remaining_secs = 0;
        metrics::set_elapsed(self.state.elapsed_secs);

        match advance(&self.state.plan, self.state.position) {
            Advance::Next(next) => self.enter(next, TransitionCause::Expired),
            Advance::Completed => self.complete(),
        }
    }

    /// Moves to `position`, passing through zero-length phases.
    fn enter(&mut self, mut position: Position, cause: TransitionCause) {
        loop {
            let duration = position.duration(&self.state.plan);
            if duration > 0 {
                self.state.position = position;
                self.state.remaining_secs = duration;
                self.announce(cause);
                self.countdown();
                return;
            }
            debug!(kind = %position.kind, set = position.set, "passing through empty phase");
            match advance(&self.state.plan, position) {
                Advance::Next(next) => position = next,
                Advance::Completed => {
                    self.complete();
                    return;
                }
            }
        }
    }

    fn announce(&self, cause: TransitionCause) {
        let plan = &self.state.plan;
        let position = self.state.position;
        let Some(exercise) = position.exercise(plan) else {
            return;
        };

        metrics::record_phase_transition(position.kind, cause);
        info!(
            exercise = %exercise.name,
            set = position.set,
            round = position.round,
            kind = %position.kind,
            cause = cause.as_str(),
            remaining_secs = self.state.remaining_secs,
            "phase entered"
        );

        self.notifier.notify(&WorkoutEvent::PhaseEntered {
            exercise_name: exercise.name.clone(),
            exercise_index: position.exercise_index,
            exercise_count: plan.exercises.len(),
            set: position.set,
            total_sets: exercise.sets,
            round: position.round,
            total_rounds: plan.round_count,
            kind: position.kind,
            duration_secs: position.duration(plan),
            cause,
        });
    }

    /// Emits a countdown while running with [`COUNTDOWN_SECS`] or less left.
    fn countdown(&self) {
        let remaining_secs = self.state.remaining_secs;
        if self.state.is_ticking() && (1..=COUNTDOWN_SECS).contains(&remaining_secs) {
            self.notifier.notify(&WorkoutEvent::Countdown { remaining_secs });
        }
    }

    fn complete(&mut self) {
        let event = WorkoutEvent::WorkoutCompleted {
            plan_name: self.state.plan.name.clone(),
            exercise_count: self.state.plan.exercises.len(),
            elapsed_secs: self.state.elapsed_secs,
        };
        info!(
            plan = %self.state.plan.name,
            elapsed_secs = self.state.elapsed_secs,
            "workout completed"
        );
        metrics::record_session_completed();

        self.state.rewind();
        self.bump();
        metrics::set_elapsed(0);

        self.recorder.record_completion(&self.state.plan);
        self.notifier.notify(&event);
    }

    const fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::notify::Recorder;
    use crate::phase::{PhaseKind, Phases};
    use crate::plan::Exercise;
    use crate::session::SessionStatus;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Completions(Mutex<Vec<String>>);

    impl HistoryRecorder for Completions {
        fn record_completion(&self, plan: &WorkoutPlan) {
            self.0.lock().unwrap().push(plan.name.clone());
        }
    }

    struct Harness {
        session: Session,
        events: Arc<Recorder>,
        history: Arc<Completions>,
    }

    impl Harness {
        fn new(plan: WorkoutPlan) -> Self {
            let events = Arc::new(Recorder::default());
            let history = Arc::new(Completions::default());
            let session = Session::new(
                plan,
                Arc::clone(&events) as Arc<dyn Notifier>,
                Arc::clone(&history) as Arc<dyn HistoryRecorder>,
            );
            Self {
                session,
                events,
                history,
            }
        }

        fn ticks(&mut self, n: usize) {
            for _ in 0..n {
                self.session.tick();
            }
        }

        fn completions(&self) -> usize {
            self.history.0.lock().unwrap().len()
        }

        fn entered_kinds(&self) -> Vec<(PhaseKind, usize, u32, u32)> {
            self.events
                .take()
                .into_iter()
                .filter_map(|e| match e {
                    WorkoutEvent::PhaseEntered {
                        kind,
                        exercise_index,
                        set,
                        round,
                        ..
                    } => Some((kind, exercise_index, set, round)),
                    _ => None,
                })
                .collect()
        }
    }

    fn single(sets: u32, work: u32, rest: u32) -> WorkoutPlan {
        WorkoutPlan::new("Legs", vec![Exercise::new("Squats", sets, work, rest)])
    }

    fn two_by_two() -> WorkoutPlan {
        WorkoutPlan::new(
            "Circuit",
            vec![
                Exercise::new("Push-ups", 1, 10, 0),
                Exercise::new("Lunges", 1, 10, 0),
            ],
        )
        .with_rounds(2, 20)
    }

    #[test]
    fn ticking_through_single_exercise() {
        let mut h = Harness::new(single(2, 5, 3));
        h.session.start().unwrap();
        h.ticks(12);
        assert_eq!(h.session.state().remaining_secs, 1);
        assert_eq!(h.session.state().elapsed_secs, 12);
        assert_eq!(h.completions(), 0);

        h.session.tick();
        let events = h.events.take();
        assert_eq!(
            events.last(),
            Some(&WorkoutEvent::WorkoutCompleted {
                plan_name: "Legs".to_string(),
                exercise_count: 1,
                elapsed_secs: 13,
            })
        );
        assert_eq!(h.completions(), 1);

        let state = h.session.state();
        assert_eq!(state.status(), SessionStatus::Idle);
        assert_eq!(state.position, Position::START);
        assert_eq!(state.remaining_secs, 5);
        assert_eq!(state.elapsed_secs, 0);
    }

    #[test]
    fn phase_sequence_with_rounds() {
        let mut h = Harness::new(two_by_two());
        h.session.start().unwrap();
        h.ticks(60);
        assert_eq!(
            h.entered_kinds(),
            vec![
                (PhaseKind::Work, 0, 1, 1),
                (PhaseKind::Work, 1, 1, 1),
                (PhaseKind::InterRoundRest, 0, 1, 1),
                (PhaseKind::Work, 0, 1, 2),
                (PhaseKind::Work, 1, 1, 2),
            ]
        );
        assert_eq!(h.completions(), 1);
    }

    #[test]
    fn countdown_on_final_seconds() {
        let mut h = Harness::new(single(1, 5, 0));
        h.session.start().unwrap();
        h.events.take();
        h.ticks(4);
        assert_eq!(
            h.events.take(),
            vec![
                WorkoutEvent::Countdown { remaining_secs: 3 },
                WorkoutEvent::Countdown { remaining_secs: 2 },
                WorkoutEvent::Countdown { remaining_secs: 1 },
            ]
        );
    }

    #[test]
    fn countdown_when_entering_short_phase() {
        let mut h = Harness::new(single(2, 5, 3));
        h.session.start().unwrap();
        h.ticks(5);
        assert_eq!(h.session.state().position.kind, PhaseKind::Rest);
        let events = h.events.take();
        assert!(matches!(
            events.as_slice(),
            [
                ..,
                WorkoutEvent::Countdown { remaining_secs: 1 },
                WorkoutEvent::PhaseEntered {
                    kind: PhaseKind::Rest,
                    duration_secs: 3,
                    ..
                },
                WorkoutEvent::Countdown { remaining_secs: 3 },
            ]
        ));

        h.ticks(2);
        assert_eq!(
            h.events.take(),
            vec![
                WorkoutEvent::Countdown { remaining_secs: 2 },
                WorkoutEvent::Countdown { remaining_secs: 1 },
            ]
        );
    }

    #[test]
    fn start_on_short_phase_counts_down() {
        let mut h = Harness::new(single(1, 2, 0));
        h.session.start().unwrap();
        assert!(matches!(
            h.events.take().as_slice(),
            [
                WorkoutEvent::PhaseEntered {
                    cause: TransitionCause::Started,
                    ..
                },
                WorkoutEvent::Countdown { remaining_secs: 2 },
            ]
        ));
    }

    #[test]
    fn idle_skip_then_start_runs_skipped_to_phase() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.skip().unwrap();
        assert!(!h.session.state().running);
        assert_eq!(h.session.state().position.kind, PhaseKind::Rest);
        assert_eq!(h.session.state().elapsed_secs, 10);
        h.events.take();

        h.session.start().unwrap();
        let state = h.session.state();
        assert_eq!(state.remaining_secs, 5);
        assert_eq!(state.position.kind, PhaseKind::Rest);
        assert_eq!(state.elapsed_secs, 10);
        assert!(matches!(
            h.events.take().as_slice(),
            [WorkoutEvent::PhaseEntered {
                cause: TransitionCause::Started,
                kind: PhaseKind::Rest,
                duration_secs: 5,
                ..
            }]
        ));
    }

    #[test]
    fn start_announces_first_phase() {
        let mut h = Harness::new(single(3, 40, 20));
        h.session.start().unwrap();
        let events = h.events.take();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            WorkoutEvent::PhaseEntered {
                cause: TransitionCause::Started,
                kind: PhaseKind::Work,
                duration_secs: 40,
                ..
            }
        ));
        assert_eq!(h.session.state().status(), SessionStatus::Running);
    }

    #[test]
    fn start_rejects_empty_plan() {
        let mut h = Harness::new(WorkoutPlan::new("empty", vec![]));
        let before = h.session.state().clone();
        assert_eq!(h.session.start(), Err(SessionError::EmptyPlan));
        assert_eq!(h.session.state(), &before);
        assert!(h.events.take().is_empty());
    }

    #[test]
    fn start_rejects_zero_rounds() {
        let mut h = Harness::new(single(1, 10, 0).with_rounds(0, 0));
        assert_eq!(h.session.start(), Err(SessionError::NoRounds));
        assert!(!h.session.state().running);
    }

    #[test]
    fn skip_folds_remaining_into_elapsed() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.start().unwrap();
        h.ticks(6);
        assert_eq!(h.session.state().remaining_secs, 4);
        let before = h.session.state().elapsed_secs;

        h.session.skip().unwrap();
        let state = h.session.state();
        assert_eq!(state.elapsed_secs, before + 4);
        assert_eq!(state.position.kind, PhaseKind::Rest);
        assert_eq!(state.remaining_secs, 5);
    }

    #[test]
    fn resume_keeps_position_and_remaining() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.start().unwrap();
        h.ticks(3);
        h.session.pause();
        h.events.take();
        let position = h.session.state().position;

        h.session.start().unwrap();
        let state = h.session.state();
        assert!(!state.paused);
        assert!(state.running);
        assert_eq!(state.remaining_secs, 7);
        assert_eq!(state.position, position);
        assert!(h.events.take().is_empty());
    }

    #[test]
    fn pause_is_idempotent() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.start().unwrap();
        h.session.pause();
        let once = (h.session.state().clone(), h.session.generation());
        h.session.pause();
        assert_eq!((h.session.state().clone(), h.session.generation()), once);
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut h = Harness::new(single(1, 10, 0));
        h.session.pause();
        assert!(!h.session.state().paused);
        assert_eq!(h.session.generation(), 0);
    }

    #[test]
    fn paused_session_ignores_ticks() {
        let mut h = Harness::new(single(1, 10, 0));
        h.session.start().unwrap();
        h.session.pause();
        h.ticks(5);
        assert_eq!(h.session.state().remaining_secs, 10);
        assert_eq!(h.session.state().elapsed_secs, 0);
    }

    #[test]
    fn idle_session_ignores_ticks() {
        let mut h = Harness::new(single(1, 10, 0));
        h.ticks(3);
        assert_eq!(h.session.state().remaining_secs, 10);
    }

    #[test]
    fn skip_while_paused_resumes() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.start().unwrap();
        h.session.pause();
        h.session.skip().unwrap();
        assert!(h.session.is_ticking());
        assert_eq!(h.session.state().position.kind, PhaseKind::Rest);
    }

    #[test]
    fn skip_rejects_missing_exercise() {
        let mut h = Harness::new(WorkoutPlan::new("empty", vec![]));
        assert_eq!(h.session.skip(), Err(SessionError::NoCurrentExercise));
        assert_eq!(h.session.state().elapsed_secs, 0);
    }

    #[test]
    fn skipping_every_phase_completes_once() {
        let mut h = Harness::new(two_by_two());
        h.session.start().unwrap();
        for _ in 0..5 {
            h.session.skip().unwrap();
        }
        let events = h.events.take();
        assert!(matches!(
            events.last(),
            Some(WorkoutEvent::WorkoutCompleted {
                elapsed_secs: 60,
                ..
            })
        ));
        assert_eq!(h.completions(), 1);
        assert!(!h.session.state().running);
    }

    #[test]
    fn skip_events_carry_skipped_cause() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.start().unwrap();
        h.events.take();
        h.session.skip().unwrap();
        assert!(matches!(
            h.events.take().as_slice(),
            [WorkoutEvent::PhaseEntered {
                cause: TransitionCause::Skipped,
                kind: PhaseKind::Rest,
                ..
            }]
        ));
    }

    #[test]
    fn zero_rest_is_passed_through() {
        let mut h = Harness::new(single(2, 2, 0));
        h.session.start().unwrap();
        h.ticks(2);
        let state = h.session.state();
        assert_eq!(state.position.kind, PhaseKind::Work);
        assert_eq!(state.position.set, 2);
        assert_eq!(state.remaining_secs, 2);
        assert_eq!(
            h.entered_kinds(),
            vec![(PhaseKind::Work, 0, 1, 1), (PhaseKind::Work, 0, 2, 1)]
        );
    }

    #[test]
    fn reset_returns_to_start() {
        let mut h = Harness::new(single(2, 10, 5));
        h.session.start().unwrap();
        h.ticks(12);
        h.session.reset();
        let state = h.session.state();
        assert_eq!(state.position, Position::START);
        assert_eq!(state.remaining_secs, 10);
        assert_eq!(state.elapsed_secs, 0);
        assert_eq!(state.status(), SessionStatus::Idle);
        assert_eq!(state.plan.name, "Legs");
    }

    #[test]
    fn set_plan_then_reset_matches_fresh_session() {
        let plan = two_by_two();
        let mut h = Harness::new(single(3, 30, 10));
        h.session.start().unwrap();
        h.ticks(40);
        h.session.set_plan(plan.clone());
        h.session.reset();
        let fresh = Session::detached(plan);
        assert_eq!(h.session.state(), fresh.state());
    }

    #[test]
    fn set_plan_does_not_start() {
        let mut h = Harness::new(single(1, 10, 0));
        h.session.start().unwrap();
        h.session.set_plan(two_by_two());
        assert!(!h.session.state().running);
        assert_eq!(h.session.total_duration(), 60);
    }

    #[test]
    fn generation_changes_with_clock_state() {
        let mut h = Harness::new(single(2, 10, 5));
        let g0 = h.session.generation();
        h.session.start().unwrap();
        let g1 = h.session.generation();
        assert_ne!(g0, g1);
        h.ticks(3);
        assert_eq!(h.session.generation(), g1);
        h.session.pause();
        assert_ne!(h.session.generation(), g1);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Start,
        Pause,
        Skip,
        Tick,
        Reset,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            1 => Just(Op::Start),
            1 => Just(Op::Pause),
            1 => Just(Op::Skip),
            6 => Just(Op::Tick),
            1 => Just(Op::Reset),
        ]
    }

    fn arb_plan() -> impl Strategy<Value = WorkoutPlan> {
        let exercise = (1u32..4, 1u32..8, 0u32..5)
            .prop_map(|(sets, work, rest)| Exercise::new("ex", sets, work, rest));
        (prop::collection::vec(exercise, 1..4), 1u32..4, 0u32..6).prop_map(
            |(exercises, rounds, round_rest)| {
                WorkoutPlan::new("generated", exercises).with_rounds(rounds, round_rest)
            },
        )
    }

    /// Seconds still to run from the current position to the end.
    fn still_to_run(state: &SessionState) -> u64 {
        let later: u64 = Phases::new(&state.plan)
            .skip_while(|p| *p != state.position)
            .skip(1)
            .map(|p| u64::from(p.duration(&state.plan)))
            .sum();
        u64::from(state.remaining_secs) + later
    }

    proptest! {
        #[test]
        fn elapsed_plus_remaining_is_total(
            plan in arb_plan(),
            ops in prop::collection::vec(arb_op(), 0..200),
        ) {
            let total = total_duration(&plan);
            let mut session = Session::detached(plan);
            for op in ops {
                match op {
                    Op::Start => {
                        let _ = session.start();
                    }
                    Op::Pause => session.pause(),
                    Op::Skip => {
                        let _ = session.skip();
                    }
                    Op::Tick => session.tick(),
                    Op::Reset => session.reset(),
                }
                let state = session.state();
                prop_assert_eq!(state.elapsed_secs + still_to_run(state), total, "after {:?}", op);
            }
        }
    }
}
