//! Bot command handlers for the CLI.
//!
//! `ask` answers a chat message with the same text the bot would post.
//! `send` pushes a message to the configured channel through the REST API.

use clap::Subcommand;
use shopbot_core::{load_catalog, AppConfig, Catalog};
use shopbot_discord::{reply_to, DiscordClient};

/// Sub-commands available under `bot`.
#[derive(Debug, Subcommand)]
pub enum BotCommands {
    /// Answer a chat message (e.g. "!products books")
    Ask {
        /// Message content as typed in the channel
        message: String,
        /// Also post the reply to the configured channel
        #[arg(long)]
        post: bool,
    },
    /// Post a message to the configured channel
    Send {
        /// Text to post
        message: String,
    },
}

pub(crate) async fn run_bot(config: &AppConfig, command: BotCommands) -> anyhow::Result<()> {
    match command {
        BotCommands::Ask { message, post } => {
            let catalog = load_configured_catalog(config)?;
            let Some(reply) = reply_to(&catalog, &message) else {
                println!("(not a bot command, no reply)");
                return Ok(());
            };
            println!("{reply}");
            if post {
                post_to_channel(config, &reply).await?;
            }
        }
        BotCommands::Send { message } => post_to_channel(config, &message).await?,
    }
    Ok(())
}

fn load_configured_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    match &config.catalog_path {
        Some(path) => {
            let catalog = load_catalog(path)?;
            tracing::debug!(path = %path.display(), "loaded catalog file");
            Ok(catalog)
        }
        None => Ok(Catalog::builtin()),
    }
}

async fn post_to_channel(config: &AppConfig, content: &str) -> anyhow::Result<()> {
    let credentials = config.discord_credentials()?;
    let client = DiscordClient::with_base_url(
        &credentials.token,
        config.http_timeout_secs,
        &config.user_agent,
        &config.discord_api_url,
    )?;
    let message = client
        .send_to_text_channel(&credentials.channel_id, content)
        .await?;
    println!("posted message {} to channel {}", message.id, credentials.channel_id);
    Ok(())
}
