mod common;

use std::io::Write;

use common::fixture_path;
use xercise::error::PlanError;
use xercise::phase::{PhaseKind, outline};
use xercise::plan::{PlanLimits, PlanLoader, total_duration};

#[test]
fn loads_yaml_fixture_with_humantime_durations() {
    let result = PlanLoader::default()
        .load(&fixture_path("leg_day.yaml"))
        .expect("leg_day.yaml should load");
    let plan = result.plan;

    assert_eq!(plan.name, "Leg Day");
    assert_eq!(plan.round_count, 2);
    assert_eq!(plan.round_rest_secs, 60);
    assert_eq!(plan.exercises.len(), 3);
    assert_eq!(plan.exercises[0].id, "squats");
    assert_eq!(plan.exercises[0].work_secs, 40);
    assert_eq!(plan.exercises[1].rest_secs, 15);
    assert_eq!(plan.exercises[2].work_secs, 90);
    assert_eq!(plan.exercises[2].rest_secs, 0);
    assert!(result.warnings.is_empty());

    assert_eq!(total_duration(&plan), 710);
}

#[test]
fn outline_of_fixture_ends_at_total() {
    let plan = PlanLoader::default()
        .load(&fixture_path("leg_day.yaml"))
        .unwrap()
        .plan;
    let entries = outline(&plan);
    let last = entries.last().unwrap();
    assert_eq!(
        last.starts_at + u64::from(last.duration_secs),
        total_duration(&plan)
    );
    assert_eq!(
        entries
            .iter()
            .filter(|e| e.position.kind == PhaseKind::InterRoundRest)
            .count(),
        1
    );
}

#[test]
fn loads_json_fixture_with_defaults() {
    let plan = PlanLoader::default()
        .load(&fixture_path("quick.json"))
        .unwrap()
        .plan;
    assert_eq!(plan.round_count, 1);
    assert_eq!(plan.round_rest_secs, 0);
    assert!(!plan.id.is_empty());
    assert!(!plan.exercises[0].id.is_empty());
    assert_eq!(total_duration(&plan), 1);
}

#[test]
fn invalid_fixture_reports_every_error() {
    let err = PlanLoader::default()
        .load(&fixture_path("invalid.yaml"))
        .unwrap_err();
    let PlanError::ValidationError { errors, .. } = err else {
        panic!("expected validation error, got {err}");
    };
    let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"name"), "{paths:?}");
    assert!(paths.contains(&"rounds"), "{paths:?}");
    assert!(paths.contains(&"exercises[0].sets"), "{paths:?}");
    assert!(paths.contains(&"exercises[1].id"), "{paths:?}");
    assert!(paths.contains(&"exercises[1].work"), "{paths:?}");
}

#[test]
fn empty_exercise_list_loads_with_warning() {
    let result = PlanLoader::default()
        .load(&fixture_path("rest_day.yaml"))
        .unwrap();
    assert!(result.plan.exercises.is_empty());
    assert!(!result.plan.is_runnable());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn unused_rests_are_warnings() {
    let result = PlanLoader::default()
        .load(&fixture_path("single_round_rest.yaml"))
        .unwrap();
    let locations: Vec<_> = result
        .warnings
        .iter()
        .filter_map(|w| w.location.as_deref())
        .collect();
    assert!(locations.contains(&"round_rest"));
    assert!(locations.contains(&"exercises[0].rest"));
}

#[test]
fn limits_are_enforced() {
    let loader = PlanLoader::new(PlanLimits {
        max_exercises: 2,
        ..PlanLimits::default()
    });
    let err = loader.load(&fixture_path("leg_day.yaml")).unwrap_err();
    assert!(matches!(err, PlanError::ValidationError { .. }));
    assert!(err.to_string().contains("limit: 2"));
}

#[test]
fn oversized_file_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "name: Big").unwrap();
    writeln!(file, "# {}", "x".repeat(256)).unwrap();

    let loader = PlanLoader::new(PlanLimits {
        max_file_size: 64,
        ..PlanLimits::default()
    });
    assert!(matches!(
        loader.load(file.path()),
        Err(PlanError::FileTooLarge { limit: 64, .. })
    ));
}

#[test]
fn bad_duration_string_is_a_parse_error() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "name: Bad\nexercises:\n  - name: a\n    sets: 1\n    work: soon\n"
    )
    .unwrap();
    assert!(matches!(
        PlanLoader::default().load(file.path()),
        Err(PlanError::ParseError { .. })
    ));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    assert!(matches!(
        PlanLoader::default().load(file.path()),
        Err(PlanError::UnsupportedFormat { .. })
    ));
}
