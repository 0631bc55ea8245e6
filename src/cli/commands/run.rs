//! `run` command: drive a workout from the terminal.
//!
//! The session only feeds a channel. This loop drains it and does the
//! announcing and event logging, so no output happens on the tick path.
//! Control lines are read from stdin; closing stdin lets the workout run
//! to completion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::args::RunArgs;
use crate::error::XerciseError;
use crate::history::{HistoryRecorder, NoopRecorder, SharedLog, WorkoutLog};
use crate::notify::{ChannelNotifier, EventLog, Fanout, Mute, Notifier, WorkoutEvent};
use crate::plan::PlanLoader;
use crate::session::{SessionController, SessionSnapshot};

use super::clock;

/// A line typed on stdin while a workout runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Start, or resume when paused (`s` or an empty line)
    Start,
    /// `p`
    Pause,
    /// Skip to the next phase (`n`)
    Skip,
    /// `r`
    Reset,
    /// Toggle announcements (`m`)
    ToggleMute,
    /// Print the current position (`?`)
    Status,
    /// `q`
    Quit,
}

impl Control {
    /// Parses one control line. Returns `None` for unknown input.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "start" | "resume" => Some(Self::Start),
            "p" | "pause" => Some(Self::Pause),
            "n" | "next" | "skip" => Some(Self::Skip),
            "r" | "reset" => Some(Self::Reset),
            "m" | "mute" => Some(Self::ToggleMute),
            "?" | "status" => Some(Self::Status),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Prints announcement text to stderr.
#[derive(Debug, Default)]
struct Announcer;

impl Notifier for Announcer {
    fn notify(&self, event: &WorkoutEvent) {
        eprintln!("{}", event.announcement());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    Quit,
    Interrupted,
}

/// Runs a workout until it completes, the user quits, or `cancel` fires.
///
/// # Errors
///
/// Returns an error if the plan, events file or history file cannot be
/// used, or if the plan cannot be started.
pub async fn run(
    args: &RunArgs,
    quiet: bool,
    cancel: CancellationToken,
) -> Result<(), XerciseError> {
    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        info!(port, "Prometheus metrics endpoint started");
    }

    info!(plan = %args.plan.display(), "loading plan");
    let result = PlanLoader::default().load(&args.plan)?;
    for warning in &result.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let (channel, mut events) = ChannelNotifier::new();
    let announcer = Arc::new(Mute::new(Announcer));
    announcer.set_muted(args.mute || quiet);

    let mut sinks = Fanout::new().with(Arc::clone(&announcer) as Arc<dyn Notifier>);
    let mut log_writer = None;
    if let Some(path) = &args.events {
        let (log, writer) = EventLog::create(path)?;
        sinks = sinks.with(Arc::new(log));
        log_writer = Some(writer);
    }

    let history = open_history(args.history.as_deref())?;
    let recorder: Arc<dyn HistoryRecorder> = match &history {
        Some((_, log)) => Arc::clone(log) as Arc<dyn HistoryRecorder>,
        None => Arc::new(NoopRecorder),
    };

    let mut controller = SessionController::new(result.plan, Arc::new(channel), recorder);
    controller.start()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let outcome = loop {
        tokio::select! {
            () = cancel.cancelled() => break Outcome::Interrupted,
            event = events.recv() => match event {
                Some(event) => {
                    sinks.notify(&event);
                    if matches!(event, WorkoutEvent::WorkoutCompleted { .. }) {
                        break Outcome::Completed;
                    }
                }
                None => break Outcome::Quit,
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match Control::parse(&line) {
                    Some(Control::Quit) => break Outcome::Quit,
                    Some(control) => apply(&mut controller, &announcer, control, quiet),
                    None => warn!(input = %line.trim(), "unknown control (s p n r m ? q)"),
                },
                Ok(None) => {
                    debug!("stdin closed");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    stdin_open = false;
                }
            },
        }
    };

    drop(sinks);
    if let Some(writer) = log_writer {
        match writer.finish().await {
            Ok(written) => debug!(written, "event log closed"),
            Err(e) => warn!(error = %e, "event log incomplete"),
        }
    }

    match outcome {
        Outcome::Completed => {
            if let Some((path, log)) = &history {
                let log = log.snapshot();
                log.save(path)?;
                let streak = log.current_streak(chrono::Local::now().date_naive());
                info!(history = %path.display(), streak, "history saved");
                if !quiet {
                    eprintln!("Streak: {streak} day(s)");
                }
            }
        }
        Outcome::Quit => {
            controller.reset();
            info!("workout abandoned");
        }
        Outcome::Interrupted => {
            controller.reset();
            info!("workout interrupted");
        }
    }

    Ok(())
}

fn open_history(path: Option<&Path>) -> Result<Option<(PathBuf, Arc<SharedLog>)>, XerciseError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let log = WorkoutLog::load(path)?;
    debug!(history = %path.display(), entries = log.entries().len(), "history loaded");
    Ok(Some((path.to_path_buf(), Arc::new(SharedLog::new(log)))))
}

fn apply(
    controller: &mut SessionController,
    announcer: &Mute<Announcer>,
    control: Control,
    quiet: bool,
) {
    let outcome = match control {
        Control::Start => controller.start(),
        Control::Skip => controller.skip(),
        Control::Pause => {
            controller.pause();
            Ok(())
        }
        Control::Reset => {
            controller.reset();
            Ok(())
        }
        Control::ToggleMute => {
            let muted = !announcer.is_muted();
            announcer.set_muted(muted);
            info!(muted, "announcements toggled");
            Ok(())
        }
        Control::Status => {
            if !quiet {
                eprintln!("{}", status_line(&controller.snapshot()));
            }
            Ok(())
        }
        Control::Quit => Ok(()),
    };
    if let Err(e) = outcome {
        warn!(error = %e, "control rejected");
        if !quiet {
            eprintln!("{e}");
        }
    }
}

fn status_line(snap: &SessionSnapshot) -> String {
    format!(
        "[{}] {} | {} left | {} / {}",
        snap.status,
        snap.phase.label,
        clock(u64::from(snap.remaining_secs)),
        clock(snap.elapsed_secs),
        clock(snap.total_secs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{PhaseKind, Position};
    use crate::plan::{Exercise, WorkoutPlan};
    use crate::session::SessionState;

    #[test]
    fn parse_controls() {
        assert_eq!(Control::parse(""), Some(Control::Start));
        assert_eq!(Control::parse("  S \n"), Some(Control::Start));
        assert_eq!(Control::parse("p"), Some(Control::Pause));
        assert_eq!(Control::parse("n"), Some(Control::Skip));
        assert_eq!(Control::parse("skip"), Some(Control::Skip));
        assert_eq!(Control::parse("r"), Some(Control::Reset));
        assert_eq!(Control::parse("m"), Some(Control::ToggleMute));
        assert_eq!(Control::parse("?"), Some(Control::Status));
        assert_eq!(Control::parse("q"), Some(Control::Quit));
        assert_eq!(Control::parse("jump"), None);
    }

    #[test]
    fn status_line_shows_phase_and_clock() {
        let mut state = SessionState::new(WorkoutPlan::new(
            "Legs",
            vec![Exercise::new("Squats", 3, 40, 20)],
        ));
        state.position = Position {
            kind: PhaseKind::Rest,
            ..Position::START
        };
        state.remaining_secs = 15;
        state.elapsed_secs = 45;
        state.running = true;
        let line = status_line(&SessionSnapshot::capture(&state));
        assert_eq!(line, "[running] Rest after Squats set 1 | 0:15 left | 0:45 / 2:40");
    }
}
