#![no_main]

//! Whole-request rendering from arbitrary JSON bytes.

use libfuzzer_sys::fuzz_target;
use patchform_core::{EngineSettings, RunRequest, run_function};

fuzz_target!(|data: &[u8]| {
    let Ok(request) = serde_json::from_slice::<RunRequest>(data) else {
        return;
    };
    let response = run_function(&EngineSettings::default(), None, &request);

    // A failed run hands the desired state back untouched.
    if response.is_fatal() {
        assert_eq!(response.desired, request.desired);
    }
    let _ = serde_json::to_string(&response);
});
