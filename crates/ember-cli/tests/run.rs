// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for the `ember` binary.
//! Each test writes a program to a temp directory, runs the binary on it,
//! and checks stdout, stderr and the exit status.

use std::path::{Path, PathBuf};
use std::process::Command;

struct Outcome {
    stdout: String,
    stderr: String,
    code: i32,
}

fn write_program(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, source).expect("failed to write program");
    path
}

/// Run `ember` with `args`, a clean environment and the extra `env` pairs.
fn ember(args: &[&str], env: &[(&str, &str)]) -> Outcome {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ember"));
    cmd.args(args)
        .env_remove("RUST_LOG")
        .env_remove("EMBER_GC_THRESHOLD")
        .env_remove("FORCE_COLOR")
        .env("NO_COLOR", "1");
    for (key, value) in env {
        cmd.env(key, value);
    }
    let out = cmd.output().expect("failed to run ember");
    Outcome {
        stdout: String::from_utf8_lossy(&out.stdout).to_string(),
        stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        code: out.status.code().unwrap_or(-1),
    }
}

const POINT: &str = "class Point {}\nvar a = new Point();\na.x = 10;\na.y = 20;\nprint a.x;\n";

/// One object stays bound while three unbound ones are allocated.
const CHURN: &str = "class N {}\nvar a = new N();\nnew N();\nnew N();\nnew N();\n";

#[test]
fn run_prints_program_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "point.em", POINT);

    let out = ember(&["run", path.to_str().unwrap()], &[]);
    assert_eq!(out.code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "10\n");
    assert!(out.stderr.is_empty(), "stderr: {}", out.stderr);
}

#[test]
fn bare_em_argument_runs_the_program() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "point.em", POINT);

    let out = ember(&[path.to_str().unwrap()], &[]);
    assert_eq!(out.code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "10\n");
}

#[test]
fn runtime_error_reports_once_and_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "bad.em", "print 1;\nprint missing;\nprint 2;\n");

    let out = ember(&["run", path.to_str().unwrap()], &[]);
    assert_eq!(out.code, 1);
    assert_eq!(out.stdout, "1\n");
    assert_eq!(out.stderr.matches("error:").count(), 1, "stderr: {}", out.stderr);
    assert!(out.stderr.contains("undefined variable `missing`"), "stderr: {}", out.stderr);
    assert!(out.stderr.contains(":2:7"), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("hint: declare it with `var`"), "stderr: {}", out.stderr);
}

#[test]
fn parse_error_exits_1_without_running() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "unfinished.em", "print 1;\nprint 2");

    let out = ember(&["run", path.to_str().unwrap()], &[]);
    assert_eq!(out.code, 1);
    assert!(out.stdout.is_empty(), "stdout: {}", out.stdout);
    assert!(out.stderr.contains("Expected ';'"), "stderr: {}", out.stderr);
}

#[test]
fn gc_stats_with_threshold_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "churn.em", CHURN);

    let out = ember(&["run", "--gc-threshold", "1", "--gc-stats", path.to_str().unwrap()], &[]);
    assert_eq!(out.code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stderr, "gc: 3 collections, 2 freed (1 in the last), 2 live, threshold 1\n");
}

#[test]
fn threshold_flag_overrides_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "churn.em", CHURN);
    let file = path.to_str().unwrap();

    let from_env = ember(&["run", "--gc-stats", file], &[("EMBER_GC_THRESHOLD", "100")]);
    assert_eq!(from_env.stderr, "gc: 0 collections, 0 freed (0 in the last), 4 live, threshold 100\n");

    let from_flag = ember(
        &["run", "--gc-threshold", "1", "--gc-stats", file],
        &[("EMBER_GC_THRESHOLD", "100")],
    );
    assert_eq!(from_flag.stderr, "gc: 3 collections, 2 freed (1 in the last), 2 live, threshold 1\n");
}

#[test]
fn bad_threshold_value_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_program(dir.path(), "point.em", POINT);

    let out = ember(&["run", "--gc-threshold", "many", path.to_str().unwrap()], &[]);
    assert_eq!(out.code, 1);
    assert!(out.stdout.is_empty());
    assert!(out.stderr.contains("--gc-threshold expects a non-negative integer"), "stderr: {}", out.stderr);
}

#[test]
fn unknown_command_exits_1() {
    let out = ember(&["frobnicate"], &[]);
    assert_eq!(out.code, 1);
    assert!(out.stderr.contains("unknown command `frobnicate`"), "stderr: {}", out.stderr);
}

#[test]
fn version_matches_package() {
    let out = ember(&["version"], &[]);
    assert_eq!(out.code, 0);
    assert_eq!(out.stdout, format!("ember {}\n", env!("CARGO_PKG_VERSION")));
}
