use super::*;
use serial_test::serial;
use tempfile::tempdir;

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.server.port, 50052);
    assert_eq!(s.server.threads, 8);
    assert_eq!(s.server.bind, "0.0.0.0");
    assert_eq!(s.client.server, "127.0.0.1:50052");
    assert_eq!(s.log_level, None);
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("create temp dir");
    let s = Settings::load_from(&dir.path().join("nope.json")).expect("load");
    assert_eq!(s, Settings::default());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "server": { "port": 6000 }, "log_level": "debug" }"#)
        .expect("write settings");

    let s = Settings::load_from(&path).expect("load");
    assert_eq!(s.server.port, 6000);
    assert_eq!(s.server.threads, DEFAULT_THREADS);
    assert_eq!(s.client, ClientSettings::default());
    assert_eq!(s.log_level.as_deref(), Some("debug"));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").expect("write settings");

    let err = Settings::load_from(&path).expect_err("malformed");
    assert!(format!("{err:#}").contains("Failed to parse settings"));
}

#[test]
#[serial]
fn env_var_selects_settings_file() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{ "client": { "server": "10.0.0.1:7000" } }"#).expect("write settings");

    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    assert_eq!(default_config_path().as_deref(), Some(path.as_path()));
    let s = Settings::load().expect("load");
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert_eq!(s.client.server, "10.0.0.1:7000");
}
