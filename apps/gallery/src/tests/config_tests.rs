use super::{apply_env, apply_file, load_settings, validate_catalog_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

use gallery_core::{DateStyle, ShapePolicy};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_the_public_feed() {
    let settings = Settings::default();
    assert_eq!(
        settings.catalog_url,
        "https://cdn.jsdelivr.net/gh/GCA-Classroom/apod/data.json"
    );
    assert_eq!(settings.date_style, DateStyle::MonthDayYear);
    assert_eq!(settings.shape_policy, ShapePolicy::TreatAsEmpty);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
            catalog_url = "http://localhost:9000/data.json"
            date_style = "iso"
            strict_payload_shape = true
        "#,
    )
    .expect("valid file");

    assert_eq!(settings.catalog_url, "http://localhost:9000/data.json");
    assert_eq!(settings.date_style, DateStyle::Iso);
    assert_eq!(settings.shape_policy, ShapePolicy::TreatAsError);
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "page_size = 20").is_err());
}

#[test]
fn env_overrides_file_values() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "date_style = \"iso\"").expect("valid file");
    apply_env(
        &mut settings,
        env_from(&[
            ("APOD_GALLERY__DATE_STYLE", "day_month_year"),
            ("APOD_GALLERY__STRICT_PAYLOAD_SHAPE", "yes"),
        ]),
    )
    .expect("valid env");

    assert_eq!(settings.date_style, DateStyle::DayMonthYear);
    assert_eq!(settings.shape_policy, ShapePolicy::TreatAsError);
}

#[test]
fn malformed_env_values_are_errors() {
    let mut settings = Settings::default();
    assert!(apply_env(
        &mut settings,
        env_from(&[("APOD_GALLERY__STRICT_PAYLOAD_SHAPE", "maybe")])
    )
    .is_err());
    assert!(apply_env(
        &mut settings,
        env_from(&[("APOD_GALLERY__DATE_STYLE", "lunar")])
    )
    .is_err());
}

#[test]
fn explicit_config_path_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("apod_gallery_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("gallery.toml");
    fs::write(&path, "date_style = \"day_month_year\"\n").expect("write config");

    let settings = load_settings(Some(path.as_path())).expect("load");
    assert_eq!(settings.date_style, DateStyle::DayMonthYear);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_explicit_config_path_is_an_error() {
    let missing = env::temp_dir().join("apod_gallery_definitely_missing.toml");
    let err = load_settings(Some(missing.as_path())).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn catalog_url_must_be_http() {
    assert!(validate_catalog_url("https://example.org/data.json").is_ok());
    assert!(validate_catalog_url(" http://127.0.0.1:8080/x ").is_ok());
    assert!(validate_catalog_url("ftp://example.org/data.json").is_err());
    assert!(validate_catalog_url("data.json").is_err());
}
