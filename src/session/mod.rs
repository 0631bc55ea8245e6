//! Workout session
//!
//! - [`state`]: live countdown state and its snapshot
//! - [`core`](self::core): the synchronous single-writer [`Session`]
//! - [`ticker`]: the recurring one-second [`TickDriver`]
//! - [`controller`]: [`SessionController`], a session driven by a ticker

pub mod controller;
pub mod core;
pub mod state;
pub mod ticker;

pub use controller::SessionController;
pub use self::core::{COUNTDOWN_SECS, Session};
pub use state::{SessionSnapshot, SessionState, SessionStatus};
pub use ticker::{TICK_PERIOD, TickDriver};
