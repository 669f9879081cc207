pub mod client;
pub mod commands;
pub mod error;
pub mod types;

pub use client::DiscordClient;
pub use commands::{parse_command, reply_to, respond, BotCommand};
pub use error::DiscordError;
pub use types::{Channel, Message, MAX_MESSAGE_CHARS};
