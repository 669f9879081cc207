//! HTTP client for the Discord REST API.
//!
//! Covers the two calls the relay needs: resolving a channel and posting a
//! message into it. Requests authenticate with a bot token. Failures are
//! surfaced as typed [`DiscordError`]s and never retried.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};

use crate::error::DiscordError;
use crate::types::{Channel, CreateMessage, Message, MAX_MESSAGE_CHARS};

/// Client for the Discord REST API.
///
/// The base URL comes from configuration (`SHOPBOT_DISCORD_API_URL`), so
/// the same constructor serves production and mock servers.
pub struct DiscordClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("token", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl DiscordClient {
    /// Creates a client rooted at `base_url`, e.g. `https://discord.com/api/v10`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DiscordError::InvalidBaseUrl`] if
    /// `base_url` is not a valid absolute URL.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, DiscordError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| DiscordError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(DiscordError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: parsed,
        })
    }

    /// Fetches a channel by its snowflake ID.
    ///
    /// # Errors
    ///
    /// - [`DiscordError::ChannelNotFound`] if the ID is malformed or Discord
    ///   answers 404.
    /// - [`DiscordError::RateLimited`] on HTTP 429.
    /// - [`DiscordError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`DiscordError::Http`] / [`DiscordError::Deserialize`] on transport
    ///   or decoding failure.
    pub async fn get_channel(&self, channel_id: &str) -> Result<Channel, DiscordError> {
        let url = self.channel_url(channel_id, &[])?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        let response = check_status(response, channel_id).await?;
        decode(response, format!("channel {channel_id}")).await
    }

    /// Posts `content` to a channel without inspecting the channel first.
    ///
    /// # Errors
    ///
    /// - [`DiscordError::EmptyMessage`] / [`DiscordError::MessageTooLong`]
    ///   when the content cannot be sent as-is.
    /// - Otherwise the same errors as [`DiscordClient::get_channel`].
    pub async fn create_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<Message, DiscordError> {
        validate_content(content)?;
        let url = self.channel_url(channel_id, &["messages"])?;
        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&CreateMessage { content })
            .send()
            .await?;
        let response = check_status(response, channel_id).await?;
        let message: Message = decode(response, format!("message in {channel_id}")).await?;
        tracing::info!(channel_id, message_id = %message.id, "discord message posted");
        Ok(message)
    }

    /// Resolves the channel, confirms it accepts text, then posts `content`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscordError::NotTextChannel`] for voice/category channels,
    /// plus every error of [`DiscordClient::create_message`].
    pub async fn send_to_text_channel(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<Message, DiscordError> {
        validate_content(content)?;
        let channel = self.get_channel(channel_id).await?;
        if !channel.is_text() {
            tracing::warn!(channel_id, kind = channel.kind, "relay target is not a text channel");
            return Err(DiscordError::NotTextChannel {
                channel_id: channel_id.to_owned(),
                kind: channel.kind,
            });
        }
        self.create_message(channel_id, content).await
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Builds `{base}/channels/{id}/{extra..}` with each segment encoded.
    ///
    /// Snowflakes are decimal integers; anything else cannot name a channel.
    fn channel_url(&self, channel_id: &str, extra: &[&str]) -> Result<Url, DiscordError> {
        if channel_id.is_empty() || !channel_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DiscordError::ChannelNotFound {
                channel_id: channel_id.to_owned(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DiscordError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            })?
            .pop_if_empty()
            .push("channels")
            .push(channel_id)
            .extend(extra);
        Ok(url)
    }
}

fn validate_content(content: &str) -> Result<(), DiscordError> {
    if content.trim().is_empty() {
        return Err(DiscordError::EmptyMessage);
    }
    let len = content.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(DiscordError::MessageTooLong {
            len,
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(())
}

async fn check_status(response: Response, channel_id: &str) -> Result<Response, DiscordError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(DiscordError::ChannelNotFound {
            channel_id: channel_id.to_owned(),
        });
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(DiscordError::RateLimited { retry_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), channel_id, "discord request failed");
    Err(DiscordError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: Response,
    context: String,
) -> Result<T, DiscordError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| DiscordError::Deserialize { context, source: e })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> DiscordClient {
        DiscordClient::with_base_url("test-token", 5, "shopbot-test/0.1", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn channel_url_appends_segments() {
        let client = test_client("https://discord.com/api/v10");
        let url = client.channel_url("42", &["messages"]).expect("url");
        assert_eq!(url.as_str(), "https://discord.com/api/v10/channels/42/messages");
    }

    #[test]
    fn channel_url_strips_trailing_slash() {
        let client = test_client("https://discord.com/api/v10/");
        let url = client.channel_url("42", &[]).expect("url");
        assert_eq!(url.as_str(), "https://discord.com/api/v10/channels/42");
    }

    #[test]
    fn channel_url_rejects_non_snowflake_ids() {
        let client = test_client("https://discord.com/api/v10");
        let err = client.channel_url("../users/@me", &[]).unwrap_err();
        assert!(matches!(err, DiscordError::ChannelNotFound { .. }));
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let err = DiscordClient::with_base_url("t", 5, "ua", "not a url").unwrap_err();
        assert!(matches!(err, DiscordError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn content_validation_counts_characters_not_bytes() {
        assert!(validate_content(&"ł".repeat(MAX_MESSAGE_CHARS)).is_ok());
        assert!(matches!(
            validate_content(&"a".repeat(MAX_MESSAGE_CHARS + 1)),
            Err(DiscordError::MessageTooLong { len: 2001, max: 2000 })
        ));
        assert!(matches!(
            validate_content("   "),
            Err(DiscordError::EmptyMessage)
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let client = test_client("https://discord.com/api/v10");
        assert!(!format!("{client:?}").contains("test-token"));
    }
}
