//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with its own temporary data directory.

mod common;

use common::{parse_json, run_cli, run_cli_failure, run_cli_success};

fn add_course(dir: &std::path::Path, name: &str, credits: &str) -> String {
    let out = run_cli_success(dir, &["course", "add", name, "--objective", "80", "--credits", credits]);
    parse_json(&out)["id"].as_str().unwrap().to_string()
}

#[test]
fn test_course_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_course(dir.path(), "Algebra", "3");

    let list = parse_json(&run_cli_success(dir.path(), &["course", "list"]));
    let rows = list.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], id.as_str());
    assert!(rows[0]["percentage"].is_null());
}

#[test]
fn test_course_add_rejects_zero_credits() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = run_cli_failure(
        dir.path(),
        &["course", "add", "Algebra", "--objective", "80", "--credits", "0"],
    );
    assert!(stderr.contains("error:"));
}

#[test]
fn test_grade_from_evaluations() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_course(dir.path(), "Algebra", "3");
    for (name, note) in [("Quiz 1", "70"), ("Quiz 2", "90"), ("Quiz 3", "86")] {
        run_cli_success(
            dir.path(),
            &["eval", "add", &id, name, "--note", note, "--weight", "10"],
        );
    }

    let grade = parse_json(&run_cli_success(dir.path(), &["grade", "show", &id]));
    assert_eq!(grade["grade"]["percentage"], 82.0);
    assert_eq!(grade["letter"], "B+");
    assert_eq!(grade["formattedGpa"], "3.30");
}

#[test]
fn test_target_follows_display_setting() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_course(dir.path(), "Statistics", "3");
    run_cli_success(dir.path(), &["eval", "add", &id, "Homework", "--note", "80", "--weight", "40"]);
    run_cli_success(dir.path(), &["eval", "add", &id, "Exam"]);

    let grade = parse_json(&run_cli_success(dir.path(), &["grade", "show", &id]));
    assert!(grade["target"]["reachable"].as_bool().unwrap());
    let course = parse_json(&run_cli_success(dir.path(), &["course", "show", &id]));
    assert!(course.get("target").is_some());

    run_cli_success(dir.path(), &["config", "set", "display.show_targets", "false"]);
    let grade = parse_json(&run_cli_success(dir.path(), &["grade", "show", &id]));
    assert!(grade.get("target").is_none());
    let course = parse_json(&run_cli_success(dir.path(), &["course", "show", &id]));
    assert!(course.get("target").is_none());
}

#[test]
fn test_weight_overflow_fails() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_course(dir.path(), "Chemistry", "2");
    run_cli_success(dir.path(), &["eval", "add", &id, "Lab", "--note", "88", "--weight", "30"]);

    let stderr = run_cli_failure(dir.path(), &["eval", "add", &id, "Exam", "--weight", "80"]);
    assert!(stderr.contains("70"), "stderr: {stderr}");

    let evals = parse_json(&run_cli_success(dir.path(), &["eval", "list", &id]));
    assert_eq!(evals.as_array().unwrap().len(), 1);
}

#[test]
fn test_auto_weights_listed() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_course(dir.path(), "Mechanics", "4");
    run_cli_success(dir.path(), &["eval", "add", &id, "Midterm", "--note", "70", "--weight", "30"]);
    run_cli_success(dir.path(), &["eval", "add", &id, "Lab"]);
    run_cli_success(dir.path(), &["eval", "add", &id, "Final", "--kind", "examen"]);

    let evals = parse_json(&run_cli_success(dir.path(), &["eval", "list", &id]));
    let weights: Vec<f64> = evals
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["effectiveWeight"].as_f64().unwrap())
        .collect();
    assert_eq!(weights, vec![30.0, 35.0, 35.0]);
}

#[test]
fn test_stats_overall() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["stats", "overall"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no graded courses"));

    let id = add_course(dir.path(), "Economics", "3");
    run_cli_success(dir.path(), &["eval", "add", &id, "Essay", "--note", "92"]);
    let stats = parse_json(&run_cli_success(dir.path(), &["stats", "overall", "--scope", "global"]));
    assert_eq!(stats["stats"]["overallGpa"], 4.0);
    assert_eq!(stats["stats"]["courseCount"], 1);
}

#[test]
fn test_boundary_edits() {
    let dir = tempfile::tempdir().unwrap();
    let bands = parse_json(&run_cli_success(dir.path(), &["boundary", "list"]));
    assert_eq!(bands.as_array().unwrap().len(), 12);

    run_cli_success(dir.path(), &["boundary", "delete", "0"]);
    let lookup = parse_json(&run_cli_success(dir.path(), &["boundary", "lookup", "97"]));
    assert_eq!(lookup["letter"], "A");

    run_cli_failure(dir.path(), &["boundary", "set-min", "0", "101"]);

    run_cli_success(dir.path(), &["boundary", "reset"]);
    let lookup = parse_json(&run_cli_success(dir.path(), &["boundary", "lookup", "97"]));
    assert_eq!(lookup["letter"], "A+");
}

#[test]
fn test_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let first = parse_json(&run_cli_success(dir.path(), &["session", "list"]));
    assert_eq!(first.as_array().unwrap().len(), 1);
    assert_eq!(first[0]["active"], true);

    let winter = parse_json(&run_cli_success(dir.path(), &["session", "add", "Winter", "--activate"]));
    let winter_id = winter["id"].as_str().unwrap();
    add_course(dir.path(), "Calculus", "2");

    let sessions = parse_json(&run_cli_success(dir.path(), &["session", "list"]));
    let active: Vec<_> = sessions
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], winter_id);
    assert_eq!(active[0]["courses"], 1);

    run_cli_success(dir.path(), &["session", "delete", winter_id]);
    let courses = parse_json(&run_cli_success(dir.path(), &["course", "list", "--all"]));
    assert!(courses.as_array().unwrap().is_empty());
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "study.focus_duration"]).trim(), "25");
    run_cli_success(dir.path(), &["config", "set", "study.focus_duration", "50"]);
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "study.focus_duration"]).trim(), "50");
    run_cli_failure(dir.path(), &["config", "get", "study.nope"]);
}

#[test]
fn test_study_log() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_course(dir.path(), "Physics", "3");
    run_cli_success(dir.path(), &["study", "log", "--course", &id]);
    run_cli_success(dir.path(), &["study", "log", "--kind", "break"]);

    let all = parse_json(&run_cli_success(dir.path(), &["study", "all"]));
    assert_eq!(all["total_sessions"], 2);
    assert_eq!(all["total_focus_min"], 25);
    assert_eq!(all["total_break_min"], 5);

    let per_course = parse_json(&run_cli_success(dir.path(), &["study", "courses"]));
    assert_eq!(per_course[0]["name"], "Physics");
    assert_eq!(per_course[0]["minutes"], 25);

    run_cli_failure(dir.path(), &["study", "log", "--course", "missing"]);
}
