//! Configuration loading and validation.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::FixedOffset;
use std::path::PathBuf;
use std::time::Duration;
use ticketwatch::config::{Config, DEFAULT_CLOCK_URL, DEFAULT_DATA_FILE};
use ticketwatch_core::TicketwatchError;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.storage.path, PathBuf::from(DEFAULT_DATA_FILE));
    assert!(config.clock.enabled);
    assert_eq!(config.clock.url, DEFAULT_CLOCK_URL);
    assert_eq!(config.clock.timeout(), Duration::from_secs(5));
    assert_eq!(config.interval(), Duration::from_secs(300));
    assert_eq!(config.calendar_offset().unwrap(), None);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = Config::from_toml_str(
        r#"
        [scheduler]
        interval_secs = 60

        [clock]
        enabled = false
        "#,
    )
    .unwrap();

    assert_eq!(config.interval(), Duration::from_secs(60));
    assert!(!config.clock.enabled);
    assert_eq!(config.clock.url, DEFAULT_CLOCK_URL);
    assert_eq!(config.storage.path, PathBuf::from(DEFAULT_DATA_FILE));
}

#[test]
fn full_file_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticketwatch.toml");
    std::fs::write(
        &path,
        r#"
        [storage]
        path = "/var/lib/ticketwatch/tickets.json"

        [clock]
        url = "http://time.internal/api"
        timeout_secs = 2

        [calendar]
        utc_offset_minutes = 120
        "#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(
        config.storage.path,
        PathBuf::from("/var/lib/ticketwatch/tickets.json")
    );
    assert_eq!(config.clock.url, "http://time.internal/api");
    assert_eq!(config.clock.timeout(), Duration::from_secs(2));
    assert_eq!(
        config.calendar_offset().unwrap(),
        FixedOffset::east_opt(7200)
    );
}

#[test]
fn invalid_values_are_rejected() {
    for text in [
        "[scheduler]\ninterval_secs = 0",
        "[clock]\ntimeout_secs = 0",
        "[clock]\nurl = \"  \"",
        "[calendar]\nutc_offset_minutes = 1000",
        "[scheduler]\ninterval_secs = \"soon\"",
        "not toml at all [",
    ] {
        assert!(
            matches!(Config::from_toml_str(text), Err(TicketwatchError::ConfigError(_))),
            "accepted: {text}"
        );
    }
}

#[test]
fn file_errors_name_the_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticketwatch.toml");
    std::fs::write(&path, "[scheduler]\ninterval_secs = 0\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    let TicketwatchError::ConfigError(msg) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert!(msg.starts_with(&path.display().to_string()), "{msg}");
    assert!(msg.contains("scheduler.interval_secs must be at least 1"));
    assert_eq!(err.to_string().matches("Configuration error").count(), 1);
}

#[test]
fn pinned_offset_builds_pinned_runner() {
    let config = Config::from_toml_str("[calendar]\nutc_offset_minutes = -300").unwrap();
    let runner = config.runner().unwrap();

    // The pinned offset wins over whatever offset "now" carries.
    let now = chrono::DateTime::parse_from_rfc3339("2026-03-02T12:00:00+02:00").unwrap();
    assert_eq!(
        runner.policy_at(&now).calendar().offset(),
        FixedOffset::west_opt(5 * 3600).unwrap()
    );
}
