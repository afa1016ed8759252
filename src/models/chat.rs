use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who authored a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("Unknown sender: '{}'", other)),
        }
    }
}

/// One row of the conversations table. Turns are insert-only and ordered
/// solely by `timestamp`.
#[derive(Clone, Debug)]
pub struct ConversationTurn {
    pub session_id: String,
    pub sender: Sender,
    pub message: String,
    pub image_path: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Client-facing shape of one history turn. `image` carries an absolute URL;
/// the stored path never leaves the service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Success body of POST /chat.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}
