use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub discord_token: Option<String>,
    pub discord_channel_id: Option<String>,
    pub discord_api_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub storefront_api_url: String,
    pub storage_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub relay_rate_limit: usize,
}

/// The pair of values the relay needs to reach its channel.
#[derive(Clone)]
pub struct DiscordCredentials {
    pub token: String,
    pub channel_id: String,
}

impl std::fmt::Debug for DiscordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordCredentials")
            .field("token", &"[redacted]")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl AppConfig {
    /// Returns the bot token, or an error naming `DISCORD_TOKEN` when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the token is not configured.
    pub fn discord_token(&self) -> Result<&str, ConfigError> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_TOKEN".to_string()))
    }

    /// Returns both Discord values required by the relay endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first absent variable.
    pub fn discord_credentials(&self) -> Result<DiscordCredentials, ConfigError> {
        let token = self.discord_token()?.to_owned();
        let channel_id = self
            .discord_channel_id
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_CHANNEL_ID".to_string()))?;
        Ok(DiscordCredentials { token, channel_id })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "discord_token",
                &self.discord_token.as_ref().map(|_| "[redacted]"),
            )
            .field("discord_channel_id", &self.discord_channel_id)
            .field("discord_api_url", &self.discord_api_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("storefront_api_url", &self.storefront_api_url)
            .field("storage_path", &self.storage_path)
            .field("catalog_path", &self.catalog_path)
            .field("relay_rate_limit", &self.relay_rate_limit)
            .finish()
    }
}
