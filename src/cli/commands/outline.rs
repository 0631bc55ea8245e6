//! `outline` command: print the timeline of a plan.

use serde::Serialize;

use crate::cli::args::{OutlineArgs, OutputFormat};
use crate::error::XerciseError;
use crate::phase::{OutlineEntry, PhaseKind, outline};
use crate::plan::{PlanLoader, WorkoutPlan, total_duration};

use super::{clock, span};

#[derive(Debug, Serialize)]
struct OutlineReport<'a> {
    plan: &'a str,
    rounds: u32,
    total_secs: u64,
    phases: &'a [OutlineEntry],
}

/// Loads a plan and prints every phase with its start offset.
///
/// # Errors
///
/// Returns an error if the plan cannot be loaded or the JSON output
/// cannot be serialized.
pub fn run(args: &OutlineArgs) -> Result<(), XerciseError> {
    let result = PlanLoader::default().load(&args.file)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let plan = result.plan;
    let entries = outline(&plan);
    let total_secs = total_duration(&plan);

    match args.format {
        OutputFormat::Human => print!("{}", render(&plan, &entries, total_secs)),
        OutputFormat::Json => {
            let report = OutlineReport {
                plan: &plan.name,
                rounds: plan.round_count,
                total_secs,
                phases: &entries,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn render(plan: &WorkoutPlan, entries: &[OutlineEntry], total_secs: u64) -> String {
    let mut out = format!(
        "{} ({} exercise(s), {} round(s))\n",
        plan.name,
        plan.exercises.len(),
        plan.round_count
    );
    for entry in entries.iter().filter(|e| e.duration_secs > 0) {
        let p = entry.position;
        let what = match p.kind {
            PhaseKind::Work => {
                let sets = p.exercise(plan).map_or(0, |e| e.sets);
                format!("{} set {}/{sets}", entry.exercise_name, p.set)
            }
            PhaseKind::Rest => format!("rest after {} set {}", entry.exercise_name, p.set),
            PhaseKind::InterRoundRest => format!("rest before round {}", p.round + 1),
        };
        out.push_str(&format!(
            "  {:>6}  r{}  {:<16} {what} ({}s)\n",
            clock(entry.starts_at),
            p.round,
            p.kind.as_str(),
            entry.duration_secs
        ));
    }
    out.push_str(&format!("total {} ({})\n", clock(total_secs), span(total_secs)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Exercise;

    #[test]
    fn render_lists_phases_and_total() {
        let plan = WorkoutPlan::new(
            "Legs",
            vec![Exercise::new("Squats", 2, 5, 3), Exercise::new("Plank", 1, 10, 0)],
        )
        .with_rounds(2, 20);
        let entries = outline(&plan);
        let text = render(&plan, &entries, total_duration(&plan));

        assert!(text.starts_with("Legs (2 exercise(s), 2 round(s))"));
        assert!(text.contains("Squats set 1/2"));
        assert!(text.contains("rest after Squats set 1"));
        assert!(text.contains("rest before round 2"));
        assert!(text.contains("total 1:06 (1m 6s)"));
        assert_eq!(text.lines().count(), 1 + 9 + 1);
    }
}
