//! `Xercise` - interval workout timer
//!
//! The core is a deterministic phase state machine ([`phase`]) driven
//! once per second by a session controller ([`session`]). Transitions
//! are reported as events to pluggable notifiers ([`notify`]) and
//! completed workouts to a history recorder ([`history`]).

pub mod cli;
pub mod error;
pub mod history;
pub mod notify;
pub mod observability;
pub mod phase;
pub mod plan;
pub mod session;
