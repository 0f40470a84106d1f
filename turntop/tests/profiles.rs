//! Tests for profile load/save and resolution through the binary (non-interactive paths only)

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

fn profiles_path(cfg: &Path) -> PathBuf {
    cfg.join("turntop").join("profiles.json")
}

fn run_turntop(cfg: &Path, args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("turntop")
        .expect("turntop binary")
        .env("XDG_CONFIG_HOME", cfg)
        .arg("--log-file")
        .arg(cfg.join("turntop.log"))
        .args(args)
        .write_stdin("")
        .output()
        .expect("run turntop");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), text)
}

#[test]
fn test_profile_created_on_first_use() {
    let td = tempfile::tempdir().unwrap();
    let (ok, out) = run_turntop(td.path(), &["--profile", "unittest", "http://example:1", "--dry-run"]);
    assert!(ok, "{out}");
    let data = fs::read_to_string(profiles_path(td.path())).expect("profiles.json created");
    assert!(data.contains("unittest"), "profiles.json missing profile entry: {data}");
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let td = tempfile::tempdir().unwrap();
    run_turntop(td.path(), &["--profile", "prod", "http://one:1", "--dry-run"]);
    let first = fs::read_to_string(profiles_path(td.path())).unwrap();

    // identical input leaves the file alone
    run_turntop(td.path(), &["--profile", "prod", "http://one:1", "--dry-run"]);
    let second = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");

    // changed input without --save prompts; empty stdin declines
    run_turntop(td.path(), &["--profile", "prod", "http://two:2", "--dry-run"]);
    let declined = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(!declined.contains("two"), "Overwrote without confirmation: {declined}");

    run_turntop(td.path(), &["--profile", "prod", "--save", "http://two:2", "--dry-run"]);
    let third = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(third.contains("two"), "Updated URL not written: {third}");
}

#[test]
fn test_profile_settings_persisted_and_loaded() {
    let td = tempfile::tempdir().unwrap();
    run_turntop(
        td.path(),
        &["--profile", "tuned", "-n", "15", "-q", "0.5", "http://sched:8000", "--dry-run"],
    );
    let data = fs::read_to_string(profiles_path(td.path())).unwrap();
    assert!(data.contains("tuned") && data.contains("15") && data.contains("0.5"), "{data}");

    // loading by name alone reuses the stored url and parameters
    let (ok, out) = run_turntop(td.path(), &["--profile", "tuned", "--dry-run"]);
    assert!(ok, "{out}");
    assert!(out.contains("ws://sched:8000/ws?top_n=15&quantum=0.5"), "{out}");
}
