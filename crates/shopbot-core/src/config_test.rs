use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with both Discord variables populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("DISCORD_TOKEN", "test-token");
    m.insert("DISCORD_CHANNEL_ID", "123456789012345678");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SHOPBOT_ENV"));
}

#[test]
fn build_app_config_applies_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.discord_api_url, "https://discord.com/api/v10");
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.storefront_api_url, "http://localhost:8080");
    assert_eq!(
        cfg.storage_path,
        std::path::PathBuf::from("./.shopbot/storage.json")
    );
    assert!(cfg.catalog_path.is_none());
    assert_eq!(cfg.relay_rate_limit, 30);
    assert!(cfg.discord_token.is_none());
    assert!(cfg.discord_channel_id.is_none());
}

#[test]
fn discord_credentials_require_token() {
    let mut map = HashMap::new();
    map.insert("DISCORD_CHANNEL_ID", "42");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.discord_credentials().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "DISCORD_TOKEN"),
        "expected MissingEnvVar(DISCORD_TOKEN), got: {err:?}"
    );
}

#[test]
fn discord_credentials_require_channel_id() {
    let mut map = HashMap::new();
    map.insert("DISCORD_TOKEN", "abc");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.discord_credentials().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "DISCORD_CHANNEL_ID"),
        "expected MissingEnvVar(DISCORD_CHANNEL_ID), got: {err:?}"
    );
}

#[test]
fn blank_discord_values_count_as_missing() {
    let mut map = full_env();
    map.insert("DISCORD_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.discord_token.is_none());
    assert!(cfg.discord_credentials().is_err());
}

#[test]
fn discord_credentials_resolve_when_both_present() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let creds = cfg.discord_credentials().expect("credentials");
    assert_eq!(creds.token, "test-token");
    assert_eq!(creds.channel_id, "123456789012345678");
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("SHOPBOT_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPBOT_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPBOT_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn http_timeout_override() {
    let mut map = full_env();
    map.insert("SHOPBOT_HTTP_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.http_timeout_secs, 5);
}

#[test]
fn http_timeout_rejects_zero() {
    let mut map = full_env();
    map.insert("SHOPBOT_HTTP_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPBOT_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SHOPBOT_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn relay_rate_limit_invalid() {
    let mut map = full_env();
    map.insert("SHOPBOT_RELAY_RATE_LIMIT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPBOT_RELAY_RATE_LIMIT"),
        "expected InvalidEnvVar(SHOPBOT_RELAY_RATE_LIMIT), got: {result:?}"
    );
}

#[test]
fn catalog_path_is_optional() {
    let mut map = full_env();
    map.insert("SHOPBOT_CATALOG_PATH", "./config/catalog.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.catalog_path,
        Some(std::path::PathBuf::from("./config/catalog.yaml"))
    );
}

#[test]
fn debug_output_redacts_token() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-token"), "token leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
