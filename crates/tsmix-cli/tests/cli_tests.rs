//! End-to-end runs of the `tsmix` binary against scenario files.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

const SCENARIO: &str = r#"{
    "options": { "unresolvedWrite": "reject" },
    "classes": [
        {
            "name": "Counter",
            "params": [{ "name": "start", "type": "number" }],
            "fields": { "count": { "param": 0 } },
            "methods": { "current": { "returnsField": "count" } }
        },
        {
            "name": "Named",
            "params": [{ "name": "name", "type": "string" }],
            "fields": { "name": { "param": 0 } },
            "methods": { "current": { "returns": "shadowed" }, "greet": { "returnsField": "name" } }
        }
    ],
    "compose": ["Counter", "Named"],
    "args": [[5], ["widget"]]
}"#;

fn write_scenario(dir: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(source.as_bytes()).unwrap();
    path
}

fn tsmix(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tsmix"))
        .args(args)
        .env_remove("TSMIX_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_inspect_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_scenario(dir.path(), "counter.json", SCENARIO);

    let output = tsmix(&["inspect", path.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["composite"], "Composite(Counter, Named)");
    assert_eq!(
        report["constructorArgs"],
        "[Counter: [start: number], Named: [name: string]]"
    );

    let members = report["members"].as_array().unwrap();
    let member = |key: &str| {
        members
            .iter()
            .find(|m| m["key"] == key)
            .unwrap_or_else(|| panic!("no member {key}"))
    };
    assert_eq!(member("count")["source"], serde_json::json!({ "kind": "ownStorage" }));
    assert_eq!(
        member("name")["source"],
        serde_json::json!({ "kind": "auxInstance", "index": 0 })
    );
    assert_eq!(member("current")["returns"], "5");
    assert_eq!(member("greet")["returns"], "widget");
    assert_eq!(member("greet")["component"], "Named");
}

#[test]
fn test_inspect_text_with_key_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_scenario(dir.path(), "counter.json", SCENARIO);

    let output = tsmix(&[
        "inspect",
        path.to_str().unwrap(),
        "--key",
        "greet",
        "--pretty",
        "false",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Composite(Counter, Named)\n"), "{stdout}");
    assert!(stdout.contains("auxiliary prototype #0"), "{stdout}");
    assert!(!stdout.contains("own storage"), "{stdout}");
}

#[test]
fn test_check_passes_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_scenario(dir.path(), "good.json", SCENARIO);
    let output = tsmix(&["check", good.to_str().unwrap(), "--pretty", "false"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "runtime composite and composite type agree\n"
    );

    let bad = write_scenario(
        dir.path(),
        "bad.json",
        &SCENARIO.replace("[[5], [\"widget\"]]", "[[\"five\"], [\"widget\"]]"),
    );
    let output = tsmix(&["check", bad.to_str().unwrap(), "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let findings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(findings[0]["severity"], "error");
    assert_eq!(findings[0]["key"], "count");
}

#[test]
fn test_check_auxiliary_field_over_primary_method_is_only_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let source = SCENARIO
        .replace(
            r#""fields": { "name": { "param": 0 } }"#,
            r#""fields": { "name": { "param": 0 }, "current": "aux" }"#,
        )
        .replace(r#""current": { "returns": "shadowed" }, "#, "");
    let path = write_scenario(dir.path(), "shadowed.json", &source);

    let output = tsmix(&["check", path.to_str().unwrap(), "--pretty", "false"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("warning current: runtime resolves from `Named`"), "{stdout}");
    assert!(stdout.ends_with("\n0 error(s), 1 warning(s)\n"), "{stdout}");
}

#[test]
fn test_missing_scenario_fails_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let output = tsmix(&["inspect", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"), "{stderr}");
}

#[test]
fn test_construction_error_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_scenario(
        dir.path(),
        "short.json",
        &SCENARIO.replace("[[5], [\"widget\"]]", "[[5]]"),
    );
    let output = tsmix(&["check", path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to construct Composite(Counter, Named)"), "{stderr}");
}
