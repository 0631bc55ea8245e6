//! Workout history and daily streak
//!
//! A session reports each completed workout to a [`HistoryRecorder`]
//! exactly once. [`WorkoutLog`] is the bundled recorder state: one entry
//! per calendar day and a streak of consecutive workout days.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::HistoryError;
use crate::plan::WorkoutPlan;

/// Receives completed workouts.
pub trait HistoryRecorder: Send + Sync {
    /// Called once for every session that reaches completion.
    fn record_completion(&self, plan: &WorkoutPlan);
}

/// Recorder that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl HistoryRecorder for NoopRecorder {
    fn record_completion(&self, _plan: &WorkoutPlan) {}
}

/// One completed workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Calendar day of completion
    pub date: NaiveDate,
    /// Name of the plan
    pub workout_name: String,
    /// Number of exercises in the plan
    pub exercise_count: usize,
}

/// Consecutive-day streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Number of consecutive days with a workout
    pub current: u32,
    /// Day of the most recent workout
    pub last_workout: Option<NaiveDate>,
}

/// Completion history with streak tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLog {
    entries: Vec<HistoryEntry>,
    streak: Streak,
}

impl WorkoutLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed workout on `today`.
    ///
    /// At most one entry is kept per day. The streak is unchanged for a
    /// second workout on the same day, grows by one when the previous
    /// workout was yesterday, and restarts at 1 otherwise.
    pub fn record(&mut self, plan: &WorkoutPlan, today: NaiveDate) {
        if self.entries.iter().any(|e| e.date == today) {
            debug!(%today, "workout already recorded today");
        } else {
            self.entries.push(HistoryEntry {
                date: today,
                workout_name: plan.name.clone(),
                exercise_count: plan.exercises.len(),
            });
        }

        let current = match self.streak.last_workout {
            Some(last) if last == today => return,
            Some(last) if is_day_before(last, today) => self.streak.current.saturating_add(1),
            _ => 1,
        };
        self.streak = Streak {
            current,
            last_workout: Some(today),
        };
        info!(streak = current, "workout streak updated");
    }

    /// Streak as seen on `today`: 0 once a day has been missed.
    #[must_use]
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        match self.streak.last_workout {
            Some(last) if last == today || is_day_before(last, today) => self.streak.current,
            _ => 0,
        }
    }

    /// All recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Raw streak data.
    #[must_use]
    pub const fn streak(&self) -> Streak {
        self.streak
    }

    /// Reads a log from a JSON file; a missing file yields an empty log.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the log as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn is_day_before(earlier: NaiveDate, later: NaiveDate) -> bool {
    earlier.succ_opt() == Some(later)
}

/// Mutex-guarded [`WorkoutLog`] recording against the local calendar.
#[derive(Debug, Default)]
pub struct SharedLog {
    log: Mutex<WorkoutLog>,
}

impl SharedLog {
    /// Wraps an existing log.
    #[must_use]
    pub const fn new(log: WorkoutLog) -> Self {
        Self {
            log: Mutex::new(log),
        }
    }

    /// Returns a copy of the current log.
    #[must_use]
    pub fn snapshot(&self) -> WorkoutLog {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistoryRecorder for SharedLog {
    fn record_completion(&self, plan: &WorkoutPlan) {
        let today = Local::now().date_naive();
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(plan, today);
    }
}
