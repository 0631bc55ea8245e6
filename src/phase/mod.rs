//! Phase sequencing
//!
//! Deterministic workout state machine. No I/O and no clock: callers
//! decide when a phase has ended and ask the sequencer what comes next.
//!
//! # Architecture
//!
//! - [`Position`]: exercise, set, round and phase kind
//! - [`Phase`]: read-only view of a position against a plan
//! - [`advance`]: the transition function
//! - [`Phases`] / [`outline`]: full traversal of a plan

pub mod position;
pub mod sequencer;

pub use position::{Phase, PhaseKind, Position};
pub use sequencer::{Advance, OutlineEntry, Phases, advance, outline};
