//! Session state and its read-only snapshot.

use serde::Serialize;

use crate::phase::{Phase, Position};
use crate::plan::{Exercise, WorkoutPlan, total_duration};

/// Coarse session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Not started, reset, or completed
    Idle,
    /// Counting down
    Running,
    /// Started but holding
    Paused,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        })
    }
}

/// Live countdown state of one session.
///
/// `paused` is only ever set while `running` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Plan being run
    pub plan: WorkoutPlan,
    /// Active phase
    pub position: Position,
    /// Seconds left in the active phase
    pub remaining_secs: u32,
    /// Seconds accounted to the session so far
    pub elapsed_secs: u64,
    /// Whether the session has been started
    pub running: bool,
    /// Whether a running session is holding
    pub paused: bool,
}

impl SessionState {
    /// Idle state at the first phase of `plan`.
    #[must_use]
    pub fn new(plan: WorkoutPlan) -> Self {
        let remaining_secs = plan.initial_remaining();
        Self {
            plan,
            position: Position::START,
            remaining_secs,
            elapsed_secs: 0,
            running: false,
            paused: false,
        }
    }

    /// Returns to the first phase, keeping the plan.
    pub fn rewind(&mut self) {
        self.position = Position::START;
        self.remaining_secs = self.plan.initial_remaining();
        self.elapsed_secs = 0;
        self.running = false;
        self.paused = false;
    }

    /// Coarse status derived from the flags.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        match (self.running, self.paused) {
            (false, _) => SessionStatus::Idle,
            (true, false) => SessionStatus::Running,
            (true, true) => SessionStatus::Paused,
        }
    }

    /// Whether the clock should be ticking.
    #[must_use]
    pub const fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }

    /// Exercise at the current position, if any.
    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.position.exercise(&self.plan)
    }
}

/// Point-in-time view of a session, as a timer display needs it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub plan_name: String,
    pub position: Position,
    pub phase: Phase,
    pub current_exercise: Option<String>,
    pub remaining_secs: u32,
    pub elapsed_secs: u64,
    pub total_secs: u64,
    /// `total_secs - elapsed_secs`
    pub remaining_total: u64,
    pub status: SessionStatus,
    /// Fraction of the active phase still left, 0.0 to 1.0
    pub phase_progress: f64,
    /// Fraction of the workout done, 0.0 to 1.0
    pub overall_progress: f64,
}

impl SessionSnapshot {
    /// Captures `state`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn capture(state: &SessionState) -> Self {
        let phase = state.position.phase(&state.plan);
        let total_secs = total_duration(&state.plan);
        let phase_progress = if phase.duration_secs == 0 {
            0.0
        } else {
            f64::from(state.remaining_secs) / f64::from(phase.duration_secs)
        };
        let overall_progress = if total_secs == 0 {
            0.0
        } else {
            (state.elapsed_secs as f64 / total_secs as f64).min(1.0)
        };
        Self {
            plan_name: state.plan.name.clone(),
            position: state.position,
            phase,
            current_exercise: state.current_exercise().map(|e| e.name.clone()),
            remaining_secs: state.remaining_secs,
            elapsed_secs: state.elapsed_secs,
            total_secs,
            remaining_total: total_secs.saturating_sub(state.elapsed_secs),
            status: state.status(),
            phase_progress,
            overall_progress,
        }
    }
}
