//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use casesync::config::load_config;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("CASESYNC_APPLICATION_LOG_LEVEL");
    std::env::remove_var("CASESYNC_APPLICATION_DRY_RUN");
    std::env::remove_var("CASESYNC_SYNC_PAGE_SIZE");
    std::env::remove_var("CASESYNC_SYNC_PERIOD");
    std::env::remove_var("TEST_ORIGIN_PASSWORD");
}

const COMPLETE_CONFIG: &str = r#"
[application]
log_level = "debug"
dry_run = true

[origin]
base_url = "https://origin.example.org"
username = "sync_user"
password = "origin_pass"
timeout_seconds = 30

[destination]
base_url = "https://destination.example.org"
username = "sync_user"
password = "destination_pass"

[sync]
source_programs = ["JRuLW57woOB", "xDsAFnQMmeU"]
tracked_entity_type = "QH1LBzGrk5g"
mapping_file = "config/mappingDictionary.json"
payload_file = "payload.json"
page_size = 25
period = "this-week"

[logging]
local_enabled = false
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.origin.base_url, "https://origin.example.org");
    assert_eq!(config.origin.timeout_seconds, 30);
    // timeout falls back to the default when omitted
    assert_eq!(config.destination.timeout_seconds, 60);
    assert_eq!(
        config.sync.source_programs,
        vec!["JRuLW57woOB", "xDsAFnQMmeU"]
    );
    assert_eq!(config.sync.tracked_entity_type, "QH1LBzGrk5g");
    assert_eq!(config.sync.page_size, 25);
    assert_eq!(config.sync.period, "this-week");
}

#[test]
fn test_load_config_with_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[origin]
base_url = "https://origin.example.org"
username = "u"
password = "p"

[destination]
base_url = "https://destination.example.org"
username = "u"
password = "p"

[sync]
source_programs = ["JRuLW57woOB"]
tracked_entity_type = "QH1LBzGrk5g"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.sync.page_size, 50);
    assert_eq!(config.sync.period, "today");
    assert_eq!(config.sync.mapping_file, "config/mappingDictionary.json");
    assert_eq!(config.sync.payload_file, "payload.json");
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_ORIGIN_PASSWORD", "s3cret");
    let file = write_config(
        r#"
[origin]
base_url = "https://origin.example.org"
username = "u"
password = "${TEST_ORIGIN_PASSWORD}"

[destination]
base_url = "https://destination.example.org"
username = "u"
password = "p"

[sync]
source_programs = ["JRuLW57woOB"]
tracked_entity_type = "QH1LBzGrk5g"
"#,
    );
    let config = load_config(file.path()).unwrap();

    use secrecy::ExposeSecret;
    assert_eq!(config.origin.password.expose_secret(), "s3cret");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[origin]
base_url = "https://origin.example.org"
username = "u"
password = "${CASESYNC_TEST_UNSET_VARIABLE}"

[destination]
base_url = "https://destination.example.org"
username = "u"
password = "p"

[sync]
source_programs = ["JRuLW57woOB"]
tracked_entity_type = "QH1LBzGrk5g"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("CASESYNC_TEST_UNSET_VARIABLE"));
}

#[test]
fn test_env_var_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("CASESYNC_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("CASESYNC_SYNC_PAGE_SIZE", "100");
    std::env::set_var("CASESYNC_SYNC_PERIOD", "all-time");

    let file = write_config(COMPLETE_CONFIG);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.sync.page_size, 100);
    assert_eq!(config.sync.period, "all-time");

    cleanup_env_vars();
}

#[test]
fn test_missing_file_fails() {
    let err = load_config("/nonexistent/casesync.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_invalid_base_url_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[origin]
base_url = "ftp://origin.example.org"
username = "u"
password = "p"

[destination]
base_url = "https://destination.example.org"
username = "u"
password = "p"

[sync]
source_programs = ["JRuLW57woOB"]
tracked_entity_type = "QH1LBzGrk5g"
"#,
    );

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_empty_programs_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[origin]
base_url = "https://origin.example.org"
username = "u"
password = "p"

[destination]
base_url = "https://destination.example.org"
username = "u"
password = "p"

[sync]
source_programs = []
tracked_entity_type = "QH1LBzGrk5g"
"#,
    );

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_invalid_period_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[origin]
base_url = "https://origin.example.org"
username = "u"
password = "p"

[destination]
base_url = "https://destination.example.org"
username = "u"
password = "p"

[sync]
source_programs = ["JRuLW57woOB"]
tracked_entity_type = "QH1LBzGrk5g"
period = "yesterday"
"#,
    );

    assert!(load_config(file.path()).is_err());
}
