mod common;

use common::{TabataProcess, fixture_path, json_lines, spawn_command};

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn fixture(name: &str) -> String {
    fixture_path(name).to_str().unwrap().to_owned()
}

// ============================================================================
// version / completions
// ============================================================================

#[test]
fn version_human() {
    let output = spawn_command(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("tabata "), "unexpected: {stdout}");
}

#[test]
fn version_json() {
    let output = spawn_command(&["version", "--format", "json"]);
    assert!(output.status.success());
    let parsed = &json_lines(&output.stdout)[0];
    assert_eq!(parsed["name"], "tabata");
    assert!(parsed["version"].is_string());
}

#[test]
fn completions_bash() {
    let output = spawn_command(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("tabata"));
}

// ============================================================================
// plan
// ============================================================================

#[test]
fn plan_defaults_to_classic_tabata() {
    let output = spawn_command(&["plan"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total Workout Time: 7:30"), "{stdout}");
    assert!(stdout.contains("Time On: 20 seconds"));
}

#[test]
fn plan_json_from_fixture() {
    let output = spawn_command(&["plan", "--config", &fixture("quick.yaml"), "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // 2 * (2 * (2 + 2) + 1 * 3)
    assert_eq!(plan["summary"]["total_seconds"], 22);
    assert_eq!(plan["summary"]["total"], "0:22");
    assert_eq!(plan["lead_in"], 1);
    assert_eq!(plan["segments"].as_array().unwrap().len(), 7);
}

#[test]
fn plan_flags_override_file() {
    let output = spawn_command(&[
        "plan",
        "--config",
        &fixture("classic.yaml"),
        "--rounds",
        "4",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["summary"]["rounds"], 4);
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_valid_files() {
    let output = spawn_command(&["validate", &fixture("classic.yaml"), &fixture("quick.yaml")]);
    assert!(output.status.success(), "{}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches(": ok").count(), 2);
}

#[test]
fn validate_out_of_range_lists_every_issue() {
    let output = spawn_command(&["validate", &fixture("out_of_range.yaml")]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("workout.work"), "{err}");
    assert!(err.contains("workout.rounds"), "{err}");
    assert!(err.contains("workout.circuits"), "{err}");
}

#[test]
fn validate_rejects_unknown_and_malformed() {
    for name in ["unknown_field.yaml", "malformed.yaml"] {
        let output = spawn_command(&["validate", &fixture(name)]);
        assert_eq!(output.status.code(), Some(2), "{name}: {}", stderr(&output));
    }
}

#[test]
fn validate_missing_file() {
    let output = spawn_command(&["validate", "/tmp/nonexistent_tabata_workout.yaml"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn validate_strict_fails_on_warnings() {
    let file = fixture("exercises.yaml");
    assert!(spawn_command(&["validate", &file]).status.success());
    let strict = spawn_command(&["validate", "--strict", &file]);
    assert_eq!(strict.status.code(), Some(2));
    assert!(stderr(&strict).contains("cycled"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run_quick_workout_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    let output = spawn_command(&[
        "run",
        "--config",
        &fixture("quick.yaml"),
        "--tick-ms",
        "5",
        "--display",
        "json",
        "--no-bell",
        "--events-file",
        events.to_str().unwrap(),
        "-q",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let frames = json_lines(&output.stdout);
    assert_eq!(frames[0]["mode"], "lead_in");
    assert_eq!(frames[0]["lead_in"], 1);
    let last = frames.last().unwrap();
    assert_eq!(last["complete"], true);
    assert_eq!(last["circuit"], 2);
    assert!(
        frames
            .iter()
            .any(|f| f["phase"] == "between_circuits_rest" && f["mode"] == "active")
    );

    let events = json_lines(&std::fs::read(&events).unwrap());
    let kinds: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    assert_eq!(kinds.first(), Some(&"WorkoutStarted"));
    assert_eq!(kinds.iter().filter(|k| **k == "PhaseEntered").count(), 7);
    assert!(kinds.contains(&"WorkoutCompleted"));
    let stopped = events.last().unwrap();
    assert_eq!(stopped["type"], "RunStopped");
    assert_eq!(stopped["reason"], "completed");
}

#[test]
fn run_refuses_empty_exercise_list() {
    let output = spawn_command(&[
        "run",
        "--config",
        &fixture("empty_exercises.yaml"),
        "--display",
        "none",
        "--no-bell",
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("start refused"));
}

#[test]
fn run_rejects_invalid_flags() {
    let output = spawn_command(&["run", "--rounds", "0", "--display", "none"]);
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn run_quits_on_command_and_hints_typos() {
    let mut process = TabataProcess::spawn_run(&["--display", "json", "--no-bell"]);

    let first = process.read_frame().await;
    assert_eq!(first["mode"], "lead_in");

    process.send_line("pasue").await;
    process.send_line("quit").await;

    let output = process.wait().await;
    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("did you mean 'pause'"), "{err}");
}
