//! Session controller: a [`Session`] driven by a [`TickDriver`].
//!
//! The session sits behind a mutex shared with the tick task. After every
//! operation the controller reconciles the driver with the session: a
//! task runs iff the session is running and not paused, and it was
//! started for the session's current generation.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::trace;

use crate::error::SessionError;
use crate::history::HistoryRecorder;
use crate::notify::Notifier;
use crate::plan::WorkoutPlan;

use super::core::Session;
use super::state::SessionSnapshot;
use super::ticker::{TICK_PERIOD, TickDriver};

/// Owns one session and its clock.
///
/// Must be used from within a Tokio runtime. Dropping the controller
/// cancels any pending tick.
#[derive(Debug)]
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    ticker: TickDriver,
}

impl SessionController {
    /// Creates an idle controller for `plan`.
    #[must_use]
    pub fn new(
        plan: WorkoutPlan,
        notifier: Arc<dyn Notifier>,
        recorder: Arc<dyn HistoryRecorder>,
    ) -> Self {
        Self::with_period(plan, notifier, recorder, TICK_PERIOD)
    }

    /// Creates a controller whose clock ticks every `period`.
    #[must_use]
    pub fn with_period(
        plan: WorkoutPlan,
        notifier: Arc<dyn Notifier>,
        recorder: Arc<dyn HistoryRecorder>,
        period: Duration,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(plan, notifier, recorder))),
            ticker: TickDriver::with_period(period),
        }
    }

    /// Starts or resumes the session.
    ///
    /// # Errors
    ///
    /// See [`Session::start`].
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.apply(Session::start)
    }

    /// Pauses a running session.
    pub fn pause(&mut self) {
        self.apply(Session::pause);
    }

    /// Stops and rewinds the session.
    pub fn reset(&mut self) {
        self.apply(Session::reset);
    }

    /// Skips the current phase.
    ///
    /// # Errors
    ///
    /// See [`Session::skip`].
    pub fn skip(&mut self) -> Result<(), SessionError> {
        self.apply(Session::skip)
    }

    /// Replaces the plan and resets.
    pub fn set_plan(&mut self, plan: WorkoutPlan) {
        self.apply(|s| s.set_plan(plan));
    }

    /// Current session view.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    /// Copy of the plan being run.
    #[must_use]
    pub fn plan(&self) -> WorkoutPlan {
        lock(&self.session).plan().clone()
    }

    /// Whether the clock is currently running.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_ticking()
    }

    fn apply<T>(&mut self, op: impl FnOnce(&mut Session) -> T) -> T {
        let shared = Arc::clone(&self.session);
        let mut session = lock(&shared);
        let out = op(&mut *session);
        reconcile(&mut self.ticker, &shared, &session);
        out
    }
}

fn reconcile(ticker: &mut TickDriver, shared: &Arc<Mutex<Session>>, session: &Session) {
    if !session.is_ticking() {
        ticker.stop_ticking();
        return;
    }
    let generation = session.generation();
    if ticker.generation() == Some(generation) {
        return;
    }

    let shared = Arc::clone(shared);
    ticker.start_ticking(generation, move || {
        let mut session = lock(&shared);
        if session.generation() != generation || !session.is_ticking() {
            trace!(generation, "stale tick dropped");
            return ControlFlow::Break(());
        }
        session.tick();
        if session.is_ticking() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    });
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
