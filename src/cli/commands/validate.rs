//! `validate` command: check plan files without running them.

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::error::{PlanError, XerciseError};
use crate::plan::{PlanLoader, total_duration};

use super::span;

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_secs: Option<u64>,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    files: usize,
    valid: usize,
    invalid: usize,
}

/// Validates every file, reporting each one, and fails if any is invalid.
///
/// # Errors
///
/// Returns the first file's error when at least one file fails to load.
pub fn run(args: &ValidateArgs) -> Result<(), XerciseError> {
    let loader = PlanLoader::default();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<PlanError> = None;

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating plan");
        let report = match loader.load(path) {
            Ok(result) => {
                for warning in &result.warnings {
                    tracing::warn!(
                        file = %path.display(),
                        location = warning.location.as_deref().unwrap_or("<unknown>"),
                        "{}",
                        warning.message
                    );
                }
                FileReport {
                    path: path.display().to_string(),
                    valid: true,
                    total_secs: Some(total_duration(&result.plan)),
                    plan: Some(result.plan.name),
                    warnings: result
                        .warnings
                        .into_iter()
                        .map(|w| match w.location {
                            Some(loc) => format!("{} at {loc}", w.message),
                            None => w.message,
                        })
                        .collect(),
                    error: None,
                }
            }
            Err(e) => {
                let report = FileReport {
                    path: path.display().to_string(),
                    valid: false,
                    plan: None,
                    total_secs: None,
                    warnings: Vec::new(),
                    error: Some(e.to_string()),
                };
                first_error.get_or_insert(e);
                report
            }
        };
        reports.push(report);
    }

    let valid = reports.iter().filter(|r| r.valid).count();
    let summary = Summary {
        files: reports.len(),
        valid,
        invalid: reports.len() - valid,
    };

    match args.format {
        OutputFormat::Human => print_human(&reports, &summary),
        OutputFormat::Json => {
            let out = serde_json::json!({ "files": reports, "summary": summary });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}

fn print_human(reports: &[FileReport], summary: &Summary) {
    for report in reports {
        match (&report.plan, report.total_secs, &report.error) {
            (Some(plan), Some(total), _) => {
                println!("ok    {}: \"{plan}\" ({})", report.path, span(total));
                for warning in &report.warnings {
                    println!("      warning: {warning}");
                }
            }
            (_, _, Some(error)) => println!("FAIL  {}: {error}", report.path),
            _ => println!("FAIL  {}", report.path),
        }
    }
    println!(
        "{} file(s): {} valid, {} invalid",
        summary.files, summary.valid, summary.invalid
    );
}
