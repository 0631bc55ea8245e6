//! Workout notifications
//!
//! The session reports what happened as discrete [`WorkoutEvent`]s handed
//! to a pluggable [`Notifier`]. Sound cues and speech are derived from
//! events by symbolic name ([`Cue`]) and text ([`announce`]); choosing
//! actual audio files or voices is up to the consumer.
//!
//! Notifiers are called while the session is locked and must return
//! promptly. [`ChannelNotifier`] hands events to another task.

pub mod announce;
pub mod emitter;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::phase::PhaseKind;

pub use emitter::{EventLog, LogWriter};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What caused a phase to be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// The session was started on this phase
    Started,
    /// The previous phase ran out
    Expired,
    /// The previous phase was skipped
    Skipped,
}

impl TransitionCause {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Expired => "expired",
            Self::Skipped => "skipped",
        }
    }
}

/// A discrete event emitted by a workout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum WorkoutEvent {
    /// A new phase is now counting down.
    PhaseEntered {
        /// Name of the current exercise (the first exercise for round rest).
        exercise_name: String,
        /// Zero-based exercise index.
        exercise_index: usize,
        /// Number of exercises in the plan.
        exercise_count: usize,
        /// Current set, 1-based.
        set: u32,
        /// Sets of the current exercise.
        total_sets: u32,
        /// Current round, 1-based.
        round: u32,
        /// Rounds in the plan.
        total_rounds: u32,
        /// Work, rest or round rest.
        kind: PhaseKind,
        /// Full length of the phase.
        duration_secs: u32,
        /// Why the phase was entered.
        cause: TransitionCause,
    },

    /// The running phase is in its final seconds.
    Countdown {
        /// Seconds left in the phase (1 to 3).
        remaining_secs: u32,
    },

    /// The last phase of the last round has ended.
    WorkoutCompleted {
        /// Name of the finished plan.
        plan_name: String,
        /// Number of exercises in the plan.
        exercise_count: usize,
        /// Seconds accounted to the session at completion.
        elapsed_secs: u64,
    },
}

/// Symbolic sound cue for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// A work phase begins
    WorkStart,
    /// A rest between sets begins
    RestStart,
    /// A rest between rounds begins
    RoundRestStart,
    /// One of the final countdown seconds
    Tick,
    /// The workout is over
    Finish,
}

impl WorkoutEvent {
    /// Sound cue to play for this event.
    #[must_use]
    pub const fn cue(&self) -> Cue {
        match self {
            Self::PhaseEntered { kind, .. } => match kind {
                PhaseKind::Work => Cue::WorkStart,
                PhaseKind::Rest => Cue::RestStart,
                PhaseKind::InterRoundRest => Cue::RoundRestStart,
            },
            Self::Countdown { .. } => Cue::Tick,
            Self::WorkoutCompleted { .. } => Cue::Finish,
        }
    }

    /// Text to speak for this event.
    #[must_use]
    pub fn announcement(&self) -> String {
        announce::announcement(self)
    }
}

// ---------------------------------------------------------------------------
// Notifiers
// ---------------------------------------------------------------------------

/// Receives workout events.
///
/// Implementations must not block; they run inside session operations.
pub trait Notifier: Send + Sync {
    /// Handles one event.
    fn notify(&self, event: &WorkoutEvent);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, event: &WorkoutEvent) {
        (**self).notify(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &WorkoutEvent) {}
}

/// Forwards events over an unbounded channel.
///
/// Sending never blocks. Events are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<WorkoutEvent>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WorkoutEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: &WorkoutEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

/// Wraps a notifier with a global mute switch.
///
/// Muting only silences the wrapped notifier; session state is unaffected.
#[derive(Debug, Default)]
pub struct Mute<N> {
    inner: N,
    muted: AtomicBool,
}

impl<N> Mute<N> {
    /// Wraps `inner`, initially unmuted.
    #[must_use]
    pub const fn new(inner: N) -> Self {
        Self {
            inner,
            muted: AtomicBool::new(false),
        }
    }

    /// Turns the mute switch on or off.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    /// Whether events are currently dropped.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }
}

impl<N: Notifier> Notifier for Mute<N> {
    fn notify(&self, event: &WorkoutEvent) {
        if !self.is_muted() {
            self.inner.notify(event);
        }
    }
}

/// Delivers each event to several notifiers in order.
#[derive(Default)]
pub struct Fanout {
    targets: Vec<Arc<dyn Notifier>>,
}

impl Fanout {
    /// Creates an empty fanout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target.
    #[must_use]
    pub fn with(mut self, target: Arc<dyn Notifier>) -> Self {
        self.targets.push(target);
        self
    }
}

impl std::fmt::Debug for Fanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fanout")
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl Notifier for Fanout {
    fn notify(&self, event: &WorkoutEvent) {
        for target in &self.targets {
            target.notify(event);
        }
    }
}

/// Test notifier recording every event it receives.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    events: std::sync::Mutex<Vec<WorkoutEvent>>,
}

#[cfg(test)]
impl Recorder {
    pub(crate) fn take(&self) -> Vec<WorkoutEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

#[cfg(test)]
impl Notifier for Recorder {
    fn notify(&self, event: &WorkoutEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
