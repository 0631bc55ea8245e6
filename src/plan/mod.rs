//! Workout plan data model
//!
//! A [`WorkoutPlan`] is an ordered list of [`Exercise`]s repeated for a
//! number of rounds, with optional rest between rounds. Plans are plain
//! data: they are immutable for the duration of a session and replaced
//! wholesale when edited.
//!
//! - [`duration`]: total planned duration of a plan
//! - [`validation`]: structural checks collecting every issue
//! - [`loader`]: reading plans from YAML or JSON files

pub mod duration;
pub mod loader;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use duration::{exercise_duration, round_duration, total_duration};
pub use loader::{LoadResult, PlanLimits, PlanLoader};
pub use validation::{ValidationResult, Validator};

/// A single exercise: `sets` work intervals separated by rest intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Opaque identifier, unique within a plan
    #[serde(default = "generate_id")]
    pub id: String,

    /// Display name, used in announcements
    pub name: String,

    /// Number of work intervals (at least 1)
    pub sets: u32,

    /// Work interval length in seconds (at least 1)
    #[serde(rename = "work", with = "seconds")]
    pub work_secs: u32,

    /// Rest between two sets in seconds (no rest follows the last set)
    #[serde(rename = "rest", default, with = "seconds")]
    pub rest_secs: u32,
}

impl Exercise {
    /// Creates an exercise with a freshly generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, sets: u32, work_secs: u32, rest_secs: u32) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            sets,
            work_secs,
            rest_secs,
        }
    }

    /// Replaces the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// An ordered list of exercises repeated `round_count` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Opaque identifier
    #[serde(default = "generate_id")]
    pub id: String,

    /// Display name, recorded in history
    pub name: String,

    /// Exercises in execution order
    #[serde(default)]
    pub exercises: Vec<Exercise>,

    /// How many times the full exercise list repeats (at least 1)
    #[serde(rename = "rounds", default = "default_round_count")]
    pub round_count: u32,

    /// Rest inserted between rounds, never after the last one
    #[serde(rename = "round_rest", default, with = "seconds")]
    pub round_rest_secs: u32,
}

impl WorkoutPlan {
    /// Creates a single-round plan with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            exercises,
            round_count: 1,
            round_rest_secs: 0,
        }
    }

    /// Sets the round count and the rest between rounds.
    #[must_use]
    pub const fn with_rounds(mut self, round_count: u32, round_rest_secs: u32) -> Self {
        self.round_count = round_count;
        self.round_rest_secs = round_rest_secs;
        self
    }

    /// Whether a session can be started on this plan.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        !self.exercises.is_empty() && self.round_count >= 1
    }

    /// Work duration of the first exercise, or 0 for an empty plan.
    ///
    /// This is the countdown an idle session shows.
    #[must_use]
    pub fn initial_remaining(&self) -> u32 {
        self.exercises.first().map_or(0, |e| e.work_secs)
    }
}

impl Default for WorkoutPlan {
    fn default() -> Self {
        Self {
            id: generate_id(),
            name: "My Custom Workout".to_string(),
            exercises: vec![Exercise::new("Warm-up", 1, 30, 15).with_id("ex-1")],
            round_count: 1,
            round_rest_secs: 0,
        }
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

const fn default_round_count() -> u32 {
    1
}

/// Serde helpers for second counts written either as integers or as
/// human-readable durations (`"45s"`, `"1m30s"`).
pub mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Text(String),
    }

    /// Parses a duration string into whole seconds.
    ///
    /// Bare digits are taken as seconds.
    ///
    /// # Errors
    ///
    /// Returns a message if the text is not a duration, has a sub-second
    /// component, or does not fit in `u32` seconds.
    pub fn parse(text: &str) -> Result<u32, String> {
        let text = text.trim();
        let duration = if text.bytes().all(|b| b.is_ascii_digit()) && !text.is_empty() {
            text.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| format!("invalid duration '{text}': {e}"))?
        } else {
            humantime::parse_duration(text).map_err(|e| format!("invalid duration '{text}': {e}"))?
        };
        if duration.subsec_nanos() != 0 {
            return Err(format!("duration '{text}' must be a whole number of seconds"));
        }
        u32::try_from(duration.as_secs()).map_err(|_| format!("duration '{text}' is too long"))
    }

    /// Serializes as an integer second count.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*value)
    }

    /// Deserializes an integer or a duration string.
    ///
    /// # Errors
    ///
    /// Fails on values that [`parse`] rejects or integers above `u32::MAX`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Secs(n) => u32::try_from(n)
                .map_err(|_| de::Error::custom(format!("duration {n}s is too long"))),
            Raw::Text(s) => parse(&s).map_err(de::Error::custom),
        }
    }
}
