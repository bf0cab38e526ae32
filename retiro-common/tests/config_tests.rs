//! Unit tests for configuration loading and graceful degradation
//!
//! Missing config files must not prevent startup: the services fall back
//! to compiled defaults with a warning. A file that exists but does not
//! parse is a hard error.
//!
//! Note: Tests that manipulate RETIRO_CONFIG are marked with #[serial]
//! to prevent ENV variable race conditions between parallel tests.

use retiro_common::config::{EventConfig, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use std::io::Write;

#[test]
#[serial]
fn missing_file_falls_back_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let config = EventConfig::load(Some("/nonexistent/retiro/config.toml")).unwrap();

    assert_eq!(config.days.len(), 5);
    assert_eq!(config.days[0].label, "30/Dez");
    assert!(!config.organizer_phone.is_empty());
    assert!(!config.await_store_append);
    assert_eq!(config.redirect_countdown_secs, 15);
}

#[test]
#[serial]
fn cli_argument_takes_priority_over_env() {
    let dir = tempfile::tempdir().unwrap();
    let cli_path = dir.path().join("cli.toml");
    let env_path = dir.path().join("env.toml");

    std::fs::write(&cli_path, "organizer_phone = \"111\"\n").unwrap();
    std::fs::write(&env_path, "organizer_phone = \"222\"\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, env_path.to_str().unwrap());
    let config = EventConfig::load(cli_path.to_str()).unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.organizer_phone, "111");
}

#[test]
#[serial]
fn env_variable_selects_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "admin_passphrase = \"2705\"").unwrap();
    writeln!(file, "await_store_append = true").unwrap();

    env::set_var(CONFIG_ENV_VAR, path.to_str().unwrap());
    let config = EventConfig::load(None).unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.admin_passphrase, "2705");
    assert!(config.await_store_append);
}

#[test]
fn partial_toml_keeps_defaults_for_missing_fields() {
    let config = EventConfig::from_toml(
        r#"
        organizer_phone = "5548999990000"

        [[days]]
        id = "day31"
        label = "31/Dez"

        [[days]]
        id = "day01"
        label = "01/Jan"
        "#,
    )
    .unwrap();

    assert_eq!(config.days.len(), 2);
    assert_eq!(config.day_label("day01"), Some("01/Jan"));
    // Untouched sections keep compiled defaults
    assert_eq!(config.guidance.temperature, 0.8);
    assert_eq!(config.event.title, "Réveillon Transcendental");
}

#[test]
fn empty_day_enumeration_is_rejected() {
    let err = EventConfig::from_toml("days = []\n").unwrap_err();
    assert!(err.to_string().contains("days"));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(EventConfig::from_toml("organizer_phone = [not toml").is_err());
}
