//! Prometheus metrics for workout sessions.
//!
//! Label values come from closed enums ([`PhaseKind`], [`TransitionCause`]),
//! never from plan contents, so cardinality stays fixed.

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::XerciseError;
use crate::notify::TransitionCause;
use crate::phase::PhaseKind;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the global metrics recorder.
///
/// With `Some(port)` a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. With `None` metrics are recorded in-process only.
/// Later calls are no-ops.
///
/// # Errors
///
/// Returns `XerciseError::Io` if the recorder or listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), XerciseError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| XerciseError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!(
        "xercise_sessions_started_total",
        "Sessions started from idle"
    );
    describe_counter!(
        "xercise_sessions_completed_total",
        "Sessions that ran to completion"
    );
    describe_counter!(
        "xercise_phase_transitions_total",
        "Phases entered, by kind and cause"
    );
    describe_counter!("xercise_skips_total", "Phases skipped before expiry");
    describe_gauge!(
        "xercise_elapsed_seconds",
        "Seconds accounted to the current session"
    );
}

/// Records a session leaving idle.
pub fn record_session_started() {
    counter!("xercise_sessions_started_total").increment(1);
}

/// Records a completed session.
pub fn record_session_completed() {
    counter!("xercise_sessions_completed_total").increment(1);
}

/// Records a phase being entered.
pub fn record_phase_transition(kind: PhaseKind, cause: TransitionCause) {
    counter!(
        "xercise_phase_transitions_total",
        "kind" => kind.as_str(),
        "cause" => cause.as_str(),
    )
    .increment(1);
}

/// Records a skip request that moved the session.
pub fn record_skip() {
    counter!("xercise_skips_total").increment(1);
}

/// Sets the elapsed-seconds gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_elapsed(elapsed_secs: u64) {
    gauge!("xercise_elapsed_seconds").set(elapsed_secs as f64);
}
