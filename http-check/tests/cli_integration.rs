//! End-to-end tests for the http-check binary.
//!
//! Network-dependent cases stick to localhost ports with nothing listening,
//! so they pass without outbound connectivity: connection refused is a
//! perfectly good "unreachable" for exercising the output contract.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn http_check() -> Command {
    Command::cargo_bin("http-check").expect("binary should be built")
}

#[test]
fn test_help_lists_flags_and_groups() {
    http_check()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--probe"))
        .stdout(predicate::str::contains("--skip-default"))
        .stdout(predicate::str::contains("--follow-redirects"))
        .stdout(predicate::str::contains("--report-redirects"))
        .stdout(predicate::str::contains("Probe Selection"))
        .stdout(predicate::str::contains("Performance"));
}

#[test]
fn test_version_output() {
    http_check()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("http-check"));
}

#[test]
fn test_zero_concurrency_rejected() {
    http_check()
        .args(["-c", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be at least 1"));
}

#[test]
fn test_zero_timeout_rejected() {
    http_check()
        .args(["-t", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timeout"));
}

#[test]
fn test_empty_input_exits_cleanly() {
    http_check()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_skip_default_without_probes_produces_nothing() {
    // Every domain expands to zero candidates; no request is ever made.
    http_check()
        .arg("-s")
        .write_stdin("example.com\nexample.org\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_malformed_probe_specs_are_silently_ignored() {
    http_check()
        .args(["-s", "-p", "noport", "-p", ":81", "-p", "http:"])
        .write_stdin("example.com\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed:").not());
}

#[test]
fn test_verbose_logs_failed_candidates() {
    http_check()
        .args(["-s", "-p", "http:1", "-t", "2000", "-v"])
        .write_stdin("127.0.0.1\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed: http://127.0.0.1:1"));
}

#[test]
fn test_failures_stay_silent_without_verbose() {
    http_check()
        .args(["-s", "-p", "http:1", "-t", "2000"])
        .write_stdin("127.0.0.1\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed:").not());
}

#[test]
fn test_input_lines_are_normalized() {
    // Mixed case and padding surface as the lower-cased candidate in the
    // verbose failure line.
    http_check()
        .args(["-s", "-p", "http:1", "-t", "2000", "-v"])
        .write_stdin("  LocalHost  \n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("failed: http://localhost:1"));
}

#[test]
fn test_file_input() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "127.0.0.1").unwrap();
    input.flush().unwrap();

    http_check()
        .args(["-s", "-p", "http:1", "-t", "2000", "-v", "-f"])
        .arg(input.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("failed: http://127.0.0.1:1"));
}

#[test]
fn test_missing_input_file_fails() {
    http_check()
        .args(["-f", "/nonexistent/domains.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open input file"));
}

#[test]
fn test_missing_config_file_fails() {
    http_check()
        .args(["--config", "/nonexistent/http-check.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_invalid_config_file_fails() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, "[defaults]\nconcurrency = 0\n").unwrap();
    config.flush().unwrap();

    http_check()
        .arg("--config")
        .arg(config.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency"));
}

#[test]
fn test_config_file_custom_catalog_expansion() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, "[custom_catalogs]\nclosed = [1]\n").unwrap();
    config.flush().unwrap();

    // The custom catalog expands to http and https on port 1; both refuse,
    // and both show up in verbose output.
    http_check()
        .arg("--config")
        .arg(config.path())
        .args(["-s", "-p", "closed", "-t", "2000", "-v"])
        .write_stdin("127.0.0.1\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed: http://127.0.0.1:1"))
        .stderr(predicate::str::contains("failed: https://127.0.0.1:1"));
}
