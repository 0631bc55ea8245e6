#![no_main]

use libfuzzer_sys::fuzz_target;
use xercise::phase::Phases;
use xercise::plan::{Exercise, WorkoutPlan, total_duration};
use xercise::session::Session;

fuzz_target!(|data: &[u8]| {
    let Some((&header, body)) = data.split_first() else {
        return;
    };
    let exercises: Vec<Exercise> = body
        .chunks_exact(3)
        .take(8)
        .map(|c| {
            Exercise::new(
                "ex",
                u32::from(c[0] % 4) + 1,
                u32::from(c[1] % 16),
                u32::from(c[2] % 8),
            )
        })
        .collect();
    let plan = WorkoutPlan::new("fuzz", exercises)
        .with_rounds(u32::from(header % 4) + 1, u32::from(header >> 4));

    let sum: u64 = Phases::new(&plan).map(|p| u64::from(p.duration(&plan))).sum();
    assert_eq!(sum, total_duration(&plan));

    // Ticking a started session for the planned duration must finish it.
    let mut session = Session::detached(plan);
    if session.start().is_ok() {
        for _ in 0..sum {
            session.tick();
        }
        assert!(!session.is_ticking());
    }
});
