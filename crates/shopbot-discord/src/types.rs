use serde::{Deserialize, Serialize};

/// Discord rejects message content longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Channel types that accept `POST /channels/{id}/messages`:
/// guild text, DM, group DM, announcement, and the three thread kinds.
const TEXT_CHANNEL_KINDS: [u8; 7] = [0, 1, 3, 5, 10, 11, 12];

/// The subset of Discord's channel object the relay needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
}

impl Channel {
    #[must_use]
    pub fn is_text(&self) -> bool {
        TEXT_CHANNEL_KINDS.contains(&self.kind)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateMessage<'a> {
    pub content: &'a str,
}
