#![no_main]

use libfuzzer_sys::fuzz_target;
use xercise::plan::{PlanLoader, WorkoutPlan};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing and validation must never panic, only reject.
    if let Ok(plan) = serde_yaml::from_str::<WorkoutPlan>(text) {
        let _ = PlanLoader::default().check(plan, "fuzz");
    }
});
