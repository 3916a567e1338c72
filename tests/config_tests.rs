//! Configuration loading tests

use std::io::Write;

use shortcoder::config::{StaticConfig, get_config, update_config};
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

// Environment mutation is process-wide, so every env-dependent assertion
// lives in this single test.
#[test]
fn test_file_then_environment_precedence() {
    let file = toml_file(
        r#"
[server]
port = 9000

[storage]
backend = "file"
data_dir = "/var/lib/shortcoder"

[service]
db_table_name = "smartcodes"
service_base_url = "https://link.me"
suggestion_length = 8
"#,
    );
    let path = file.path().to_str().unwrap();

    let config = StaticConfig::try_load_from(path).expect("config should load");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.storage.backend, "file");
    assert_eq!(config.service.db_table_name, "smartcodes");
    assert_eq!(config.service.service_base_url, "https://link.me");
    assert_eq!(config.service.suggestion_length, 8);
    assert_eq!(config.service.cross_origin_domain, "*");

    // SAFETY: no other test in this binary reads these variables.
    unsafe {
        std::env::set_var("SC__SERVER__PORT", "9100");
        std::env::set_var("SC__SERVICE__DB_TABLE_NAME", "prefixed");
        std::env::set_var("CROSS_ORIGIN_DOMAIN", "https://app.link.me");
    }
    let config = StaticConfig::try_load_from(path).expect("config should load");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.service.db_table_name, "prefixed");
    assert_eq!(config.service.cross_origin_domain, "https://app.link.me");

    // plain variables win over prefixed ones
    unsafe {
        std::env::set_var("DB_TABLE_NAME", "plain");
    }
    let config = StaticConfig::try_load_from(path).expect("config should load");
    assert_eq!(config.service.db_table_name, "plain");

    unsafe {
        std::env::remove_var("SC__SERVER__PORT");
        std::env::remove_var("SC__SERVICE__DB_TABLE_NAME");
        std::env::remove_var("CROSS_ORIGIN_DOMAIN");
        std::env::remove_var("DB_TABLE_NAME");
    }
}

#[test]
fn test_invalid_file_is_an_error() {
    let file = toml_file("[logging]\nlevel = [1, 2]\n");
    let path = file.path().to_str().unwrap();
    assert!(StaticConfig::try_load_from(path).is_err());
}

#[test]
fn test_update_config_replaces_global() {
    let mut config = StaticConfig::default();
    config.service.api_base_url = "https://api.link.me".to_string();
    update_config(config.clone());
    assert_eq!(*get_config(), config);
}
