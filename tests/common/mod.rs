//! Shared integration-test helpers for running the `xercise` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Runs the binary to completion with stdin closed.
#[allow(clippy::missing_panics_doc)]
pub fn run_xercise(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xercise"))
        .args(args)
        .env_remove("XERCISE_LOG_LEVEL")
        .env_remove("XERCISE_PLAN")
        .env_remove("XERCISE_EVENTS")
        .env_remove("XERCISE_HISTORY")
        .env_remove("XERCISE_LOG_FORMAT")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run xercise")
}

/// Stdout of a finished process as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished process as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
