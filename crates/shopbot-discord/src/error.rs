use thiserror::Error;

/// Errors returned by the Discord REST client.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The channel does not exist or the bot cannot see it.
    #[error("channel not found: {channel_id}")]
    ChannelNotFound { channel_id: String },

    /// The channel exists but messages cannot be posted to it.
    #[error("channel {channel_id} is not a text channel (type {kind})")]
    NotTextChannel { channel_id: String, kind: u8 },

    #[error("message is empty")]
    EmptyMessage,

    #[error("message is {len} characters; the limit is {max}")]
    MessageTooLong { len: usize, max: usize },

    /// Discord answered 429. The client never retries on its own.
    #[error("rate limited by Discord (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Discord API URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
