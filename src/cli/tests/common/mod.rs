#![allow(dead_code)]
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::Command;

pub fn apitest_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_apitest"))
}

pub fn json_subset(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Object(exp_map), Value::Object(act_map)) => exp_map.iter().all(|(k, v)| {
            act_map
                .get(k)
                .map(|act_v| json_subset(v, act_v))
                .unwrap_or(false)
        }),
        (Value::Array(exp_arr), Value::Array(act_arr)) => {
            exp_arr.len() == act_arr.len()
                && exp_arr
                    .iter()
                    .zip(act_arr.iter())
                    .all(|(e, a)| json_subset(e, a))
        }
        (Value::String(s), _) if s == "{{*}}" => true,
        (Value::String(s), Value::String(a)) if s.starts_with("{{regex:") && s.ends_with("}}") => {
            let pattern = &s[8..s.len() - 2];
            regex::Regex::new(pattern)
                .map(|re| re.is_match(a))
                .unwrap_or(false)
        }
        _ => expected == actual,
    }
}

pub fn validate_pure_json_response(stdout: &str, expected_path: &Path) -> Result<(), String> {
    let expected_content = fs::read_to_string(expected_path)
        .map_err(|e| format!("Failed to read expected file: {e}"))?;
    let expected_json: Value = serde_json::from_str(&expected_content)
        .map_err(|e| format!("Failed to parse expected JSON: {e}"))?;
    let actual_json: Value = serde_json::from_str(stdout)
        .map_err(|e| format!("Failed to parse actual JSON response: {e}\n{stdout}"))?;

    if !json_subset(&expected_json, &actual_json) {
        return Err(format!(
            "JSON mismatch!\nExpected subset:\n{}\nActual:\n{}",
            serde_json::to_string_pretty(&expected_json).unwrap(),
            serde_json::to_string_pretty(&actual_json).unwrap()
        ));
    }

    Ok(())
}

/// Writes a small project whose only environment points at `base_url`.
pub fn write_sample_project(dir: &Path, base_url: &str) {
    let project = json!({
        "project": {
            "id": "p1",
            "name": "Sample",
            "environments": [
                {"name": "default", "base_url": base_url, "variables": {"greeting": "hi"}},
                {"name": "staging", "base_url": "http://127.0.0.1:1"}
            ]
        },
        "interfaces": [
            {"id": "ping", "project_id": "p1", "name": "Ping", "method": "GET", "path": "/ping"}
        ],
        "collections": [
            {"id": "smoke", "project_id": "p1", "name": "Smoke"},
            {"id": "spare", "project_id": "p1", "name": "Spare"}
        ],
        "test_cases": [
            {
                "id": "ping-ok",
                "collection_id": "smoke",
                "interface_id": "ping",
                "name": "ping answers",
                "order": 1,
                "assertion_script": "assert.equal(status, 200);"
            },
            {
                "id": "ping-spare",
                "collection_id": "spare",
                "interface_id": "ping",
                "name": "spare ping",
                "enabled": false
            }
        ]
    });
    fs::write(
        dir.join("project.json"),
        serde_json::to_string_pretty(&project).unwrap(),
    )
    .unwrap();
}
