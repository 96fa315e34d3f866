//! Integration tests for CLI argument handling
//!
//! Every case here fails or exits before any network request is made.

use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_distmatrix"))
        .args(args)
        .env_remove("DISTMATRIX_API_KEY")
        .output()
        .expect("Failed to execute distmatrix")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("distmatrix"), "Help should mention distmatrix");
    assert!(stdout.contains("calculate"), "Help should list the calculate command");
    assert!(stdout.contains("clear-cache"), "Help should list the clear-cache command");
}

#[test]
fn test_calculate_help_lists_options() {
    let output = run_cli(&["calculate", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--origin"));
    assert!(stdout.contains("--traffic-model"));
}

#[test]
fn test_invalid_mode_prints_error_and_exits() {
    let output = run_cli(&["calculate", "-o", "A", "-d", "B", "--mode", "flying"]);
    assert!(!output.status.success(), "Expected invalid mode to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("flying"),
        "Should print error message about the invalid mode: {}",
        stderr
    );
}

#[test]
fn test_missing_api_key_fails_before_request() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = temp_dir.path().join("settings.json");
    let settings = settings.to_str().expect("Temp path should be UTF-8");

    let output = run_cli(&["--config", settings, "calculate", "-o", "A", "-d", "B"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API key"), "Should explain the missing key: {}", stderr);
}

#[test]
fn test_invalid_ttl_in_settings_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("settings.json");
    std::fs::write(&path, r#"{"api_key": "abc", "cache_ttl_seconds": 42}"#).unwrap();

    let output = run_cli(&["--config", path.to_str().unwrap(), "calculate", "-o", "A", "-d", "B"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("300"), "Should explain the TTL rule: {}", stderr);
}

#[test]
fn test_invalid_default_in_settings_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("settings.json");
    std::fs::write(&path, r#"{"api_key": "abc", "defaults": {"units": "parsecs"}}"#).unwrap();

    let output = run_cli(&["--config", path.to_str().unwrap(), "calculate", "-o", "A", "-d", "B"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsecs"), "Should name the bad default: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Library-level checks of the same parsing, without spawning the binary

    use clap::Parser;
    use distmatrix::cli::{Cli, Command};
    use distmatrix::data::TravelMode;

    #[test]
    fn test_calc_alias() {
        let cli = Cli::parse_from(["distmatrix", "calc", "-o", "A", "-d", "B", "--mode", "transit"]);
        match cli.command {
            Command::Calculate(args) => assert_eq!(args.mode, Some(TravelMode::Transit)),
            other => panic!("Expected calculate, got {:?}", other),
        }
    }
}
