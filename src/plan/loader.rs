//! Plan file loader
//!
//! Loading pipeline:
//! 1. Size check against [`PlanLimits::max_file_size`]
//! 2. Read and strip a UTF-8 BOM
//! 3. Parse as YAML or JSON (by extension)
//! 4. Validate, collecting every issue
//! 5. Return the plan with its warnings

use std::path::Path;

use crate::error::PlanError;
use crate::plan::WorkoutPlan;
use crate::plan::validation::Validator;

/// Limits guarding against absurd plan files.
///
/// Defaults can be overridden through `XERCISE_MAX_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanLimits {
    /// Maximum number of exercises in one plan.
    pub max_exercises: usize,

    /// Maximum sets per exercise.
    pub max_sets: u32,

    /// Maximum number of rounds.
    pub max_rounds: u32,

    /// Maximum plan file size in bytes.
    pub max_file_size: u64,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            max_exercises: env_or("XERCISE_MAX_EXERCISES", 100),
            max_sets: env_or("XERCISE_MAX_SETS", 100),
            max_rounds: env_or("XERCISE_MAX_ROUNDS", 100),
            max_file_size: env_or("XERCISE_MAX_PLAN_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a plan file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated plan.
    pub plan: WorkoutPlan,

    /// Warnings encountered during validation.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during plan loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Field the warning refers to.
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

/// Plan file loader.
#[derive(Debug, Default)]
pub struct PlanLoader {
    limits: PlanLimits,
}

impl PlanLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: PlanLimits) -> Self {
        Self { limits }
    }

    /// Returns the limits this loader enforces.
    #[must_use]
    pub const fn limits(&self) -> &PlanLimits {
        &self.limits
    }

    /// Loads and validates a plan file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing or larger than the size limit
    /// - The extension is not `.yaml`, `.yml` or `.json`
    /// - Parsing fails
    /// - Validation finds any error-severity issue
    pub fn load(&self, path: &Path) -> Result<LoadResult, PlanError> {
        let format = detect_format(path)?;

        let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
        if metadata.len() > self.limits.max_file_size {
            return Err(PlanError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.limits.max_file_size,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

        if raw.trim().is_empty() {
            return Err(PlanError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "plan file is empty".to_string(),
            });
        }

        let plan = match format {
            Format::Yaml => {
                serde_yaml::from_str::<WorkoutPlan>(raw).map_err(|e| PlanError::ParseError {
                    path: path.to_path_buf(),
                    line: e.location().map(|l| l.line()),
                    message: e.to_string(),
                })?
            }
            Format::Json => {
                serde_json::from_str::<WorkoutPlan>(raw).map_err(|e| PlanError::ParseError {
                    path: path.to_path_buf(),
                    line: Some(e.line()),
                    message: e.to_string(),
                })?
            }
        };

        self.check(plan, &path.display().to_string())
    }

    /// Validates an in-memory plan the same way [`load`](Self::load) does.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::ValidationError` listing every error found.
    pub fn check(&self, plan: WorkoutPlan, origin: &str) -> Result<LoadResult, PlanError> {
        let result = Validator::new().validate(&plan, &self.limits);
        if result.has_errors() {
            return Err(PlanError::ValidationError {
                path: origin.to_string(),
                errors: result.errors,
            });
        }

        let warnings = result
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();

        tracing::debug!(
            plan = %plan.name,
            exercises = plan.exercises.len(),
            rounds = plan.round_count,
            "plan loaded"
        );

        Ok(LoadResult { plan, warnings })
    }
}

fn read_error(path: &Path, source: std::io::Error) -> PlanError {
    let path = path.to_path_buf();
    if source.kind() == std::io::ErrorKind::NotFound {
        PlanError::MissingFile { path }
    } else {
        PlanError::Unreadable { path, source }
    }
}

fn detect_format(path: &Path) -> Result<Format, PlanError> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(PlanError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
