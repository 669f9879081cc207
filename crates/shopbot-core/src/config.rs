use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Discord credentials are optional here; binaries that need them call
/// [`AppConfig::discord_credentials`] so the error names the missing variable.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SHOPBOT_ENV", "development"))?;

    let bind_addr = parse_addr("SHOPBOT_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("SHOPBOT_LOG_LEVEL", "info");

    let discord_token = optional("DISCORD_TOKEN");
    let discord_channel_id = optional("DISCORD_CHANNEL_ID");
    let discord_api_url = or_default("SHOPBOT_DISCORD_API_URL", "https://discord.com/api/v10");

    let http_timeout_secs = parse_u64("SHOPBOT_HTTP_TIMEOUT_SECS", "30")?;
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPBOT_HTTP_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = or_default(
        "SHOPBOT_USER_AGENT",
        "shopbot/0.1 (+https://github.com/shopbot)",
    );

    let storefront_api_url = or_default("SHOPBOT_STOREFRONT_API_URL", "http://localhost:8080");
    let storage_path = PathBuf::from(or_default(
        "SHOPBOT_STORAGE_PATH",
        "./.shopbot/storage.json",
    ));
    let catalog_path = optional("SHOPBOT_CATALOG_PATH").map(PathBuf::from);
    let relay_rate_limit = parse_usize("SHOPBOT_RELAY_RATE_LIMIT", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        discord_token,
        discord_channel_id,
        discord_api_url,
        http_timeout_secs,
        user_agent,
        storefront_api_url,
        storage_path,
        catalog_path,
        relay_rate_limit,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPBOT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
