//! Config file loading end to end.

use std::io::Write;

use pickem_config::{ConfigError, DEFAULT_ERGAST_BASE_URL, PickemConfig};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn config_file_selects_backends() {
    let file = write_config(
        r#"
        [app]
        ascii_only = true
        report_vitals = true

        [api]
        base_url = "http://localhost:9000/"
        user_id = "u-1"

        [ergast]
        base_url = "http://localhost:9001"
        max_retries = 0
        "#,
    );

    let config = PickemConfig::load_from(file.path()).unwrap();
    assert!(config.app.ui_options().ascii_only);
    assert!(config.app.report_vitals);
    assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:9000/"));
    assert_eq!(config.ergast.base_url, "http://localhost:9001");
    assert_eq!(config.ergast.max_retries, 0);
    assert_eq!(config.ergast.grid_size, 20);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let file = write_config("[app]\nhigh_contrast = true\n");
    let config = PickemConfig::load_from(file.path()).unwrap();
    assert!(config.app.high_contrast);
    assert_eq!(config.ergast.base_url, DEFAULT_ERGAST_BASE_URL);
    assert!(config.api.base_url.is_none());
}

#[test]
fn unknown_keys_report_the_path() {
    let file = write_config("[app]\ntheme = \"dark\"\n");
    let err = PickemConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == file.path()));
}

#[test]
fn unreadable_path_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PickemConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
