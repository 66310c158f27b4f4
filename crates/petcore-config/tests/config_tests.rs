use std::collections::HashMap;

use petcore_config::{manager::apply_env_overrides, Backend, Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_points_at_http_backend() {
    let cfg = Config::default();

    assert_eq!(cfg.backend, Backend::Http);
    assert!(cfg.api_base_url.starts_with("http"));
    assert_eq!(cfg.weight_unit, "kg");
    assert!(cfg.user_id.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("backend", "memory").expect("backend");
    cfg.set("user_id", "owner-1").expect("user");
    cfg.set("api_base_url", "https://pets.example.com/api/").expect("url");

    manager.save(&cfg).expect("save config");
    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.api_base_url, "https://pets.example.com/api");
}

#[test]
fn missing_file_loads_defaults_and_unknown_backend_falls_back() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    assert_eq!(manager.load().expect("defaults"), Config::default());

    std::fs::write(manager.config_path(), r#"{"backend":"carrier-pigeon"}"#).unwrap();
    let loaded = manager.load().expect("lenient load");
    assert_eq!(loaded.backend, Backend::Http);
    assert_eq!(loaded.request_timeout_secs, 30);
}

#[test]
fn set_rejects_bad_values() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set("request_timeout_secs", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("weight_unit", "stone"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(cfg.set("colour", "on"), Err(ConfigError::UnknownKey(_))));

    cfg.set("ui_color_enabled", "off").unwrap();
    assert!(!cfg.ui_color_enabled);
}

#[test]
fn env_overrides_win_over_stored_values() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("PETCORE_API_URL", "https://staging.example.com"),
        ("PETCORE_BACKEND", "memory"),
        ("PETCORE_USER_ID", " user-42 "),
    ]);
    let mut cfg = Config::default();
    apply_env_overrides(&mut cfg, |key| env.get(key).map(|v| v.to_string())).unwrap();

    assert_eq!(cfg.api_base_url, "https://staging.example.com");
    assert_eq!(cfg.backend, Backend::Memory);
    assert_eq!(cfg.user_id.as_deref(), Some("user-42"));
}

#[test]
fn invalid_backend_override_is_reported() {
    let mut cfg = Config::default();
    let err = apply_env_overrides(&mut cfg, |key| {
        (key == "PETCORE_BACKEND").then(|| "ftp".to_string())
    })
    .unwrap_err();
    assert!(err.to_string().contains("PETCORE_BACKEND"));
}
