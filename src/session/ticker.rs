//! One-per-second tick driver.
//!
//! A [`TickDriver`] owns at most one background tick task. Starting a new
//! task cancels the previous one, so two timers never drive the same
//! session.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

struct ActiveTicker {
    generation: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the recurring tick task of a session.
pub struct TickDriver {
    period: Duration,
    active: Option<ActiveTicker>,
}

impl std::fmt::Debug for TickDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickDriver")
            .field("period", &self.period)
            .field("generation", &self.generation())
            .field("ticking", &self.is_ticking())
            .finish()
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TickDriver {
    /// Creates a driver ticking every [`TICK_PERIOD`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Creates a driver with a custom period.
    #[must_use]
    pub const fn with_period(period: Duration) -> Self {
        Self {
            period,
            active: None,
        }
    }

    /// Spawns a tick task calling `on_tick` once per period.
    ///
    /// The first call happens one full period from now. The task ends when
    /// `on_tick` returns `Break` or the driver is stopped. Any previous
    /// task is cancelled first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_ticking<F>(&mut self, generation: u64, mut on_tick: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.stop_ticking();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.period;
        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(first, period);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(generation, "ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if on_tick().is_break() {
                            debug!(generation, "ticker finished");
                            break;
                        }
                    }
                }
            }
        });

        debug!(generation, ?period, "ticker started");
        self.active = Some(ActiveTicker {
            generation,
            cancel,
            handle,
        });
    }

    /// Cancels the tick task, if any. No tick is delivered afterwards.
    pub fn stop_ticking(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            debug!(generation = active.generation, "ticker stopped");
        }
    }

    /// Whether a tick task is alive.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| !a.handle.is_finished() && !a.cancel.is_cancelled())
    }

    /// Generation the live task was started for.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.active
            .as_ref()
            .filter(|a| !a.handle.is_finished())
            .map(|a| a.generation)
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop_ticking();
    }
}
