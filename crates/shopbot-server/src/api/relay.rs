//! `POST /discord/send`: forwards a form-submitted message to the configured
//! Discord channel. Answers in plain text.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form,
};
use serde::Deserialize;
use shopbot_discord::{DiscordError, MAX_MESSAGE_CHARS};

use super::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct RelayForm {
    message: Option<String>,
}

pub(super) async fn send_message(
    State(state): State<AppState>,
    form: Result<Form<RelayForm>, FormRejection>,
) -> (StatusCode, String) {
    let message = match form {
        Ok(Form(RelayForm {
            message: Some(message),
        })) if !message.trim().is_empty() => message,
        Ok(_) => return missing_message(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "relay form rejected");
            return missing_message();
        }
    };

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return (
            StatusCode::BAD_REQUEST,
            format!("Message exceeds {MAX_MESSAGE_CHARS} characters"),
        );
    }

    let channel_id = state.channel_id.as_ref();
    match state.discord.send_to_text_channel(channel_id, &message).await {
        Ok(_) => (StatusCode::OK, "Message sent successfully!".to_owned()),
        Err(DiscordError::ChannelNotFound { .. } | DiscordError::NotTextChannel { .. }) => {
            tracing::warn!(channel_id, "relay channel not found");
            (
                StatusCode::NOT_FOUND,
                format!("Channel not found with ID: {channel_id}"),
            )
        }
        Err(e) => {
            tracing::error!(channel_id, error = %e, "relay send failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error sending message: {e}"),
            )
        }
    }
}

fn missing_message() -> (StatusCode, String) {
    (
        StatusCode::BAD_REQUEST,
        "Missing 'message' parameter".to_owned(),
    )
}
