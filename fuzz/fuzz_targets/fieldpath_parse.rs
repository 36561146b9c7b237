#![no_main]

//! Field path parsing and paved reads/writes on arbitrary path strings.

use libfuzzer_sys::fuzz_target;
use patchform_paved::{FieldPath, expand_wildcards, get, set};
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(path) = FieldPath::parse(s) else {
        return;
    };

    let _ = FieldPath::parse(&path.to_string());

    let mut doc = json!({
        "metadata": { "labels": { "a": "b" } },
        "spec": { "items": [{ "name": "x" }, { "name": "y" }] }
    });
    let _ = get(&doc, &path);
    if let Ok(targets) = expand_wildcards(&doc, &path) {
        for t in targets {
            let _ = set(&mut doc, &t, json!("fuzz"));
        }
    }
});
